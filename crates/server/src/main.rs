//! Callflow service entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use callflow_client::{
    Clients, GrpcDialogGateway, GrpcMediaGateway, GrpcSttGateway, GrpcTtsGateway,
};
use callflow_config::Settings;
use callflow_contracts::telephony::telephony_action_service_server::TelephonyActionServiceServer;
use callflow_pipeline::{CallPipeline, EngineConfig};
use callflow_server::{health_router, load_server_tls, TelephonyServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            // Tracing is not up yet.
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&settings);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %settings.env,
        "starting callflow service"
    );

    let clients = Clients::connect(&settings).await?;
    let pipeline = build_pipeline(&settings, &clients);

    // Health endpoint on its own port.
    let health_addr = SocketAddr::from(([0, 0, 0, 0], settings.http_port));
    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(health_addr).await {
            Ok(listener) => {
                tracing::info!(addr = %health_addr, "health endpoint listening");
                if let Err(err) = axum::serve(listener, health_router()).await {
                    tracing::error!(error = %err, "health endpoint failed");
                }
            }
            Err(err) => tracing::error!(error = %err, "could not bind health endpoint"),
        }
    });

    // Primary gRPC surface, mTLS when the material is readable.
    let grpc_addr = SocketAddr::from(([0, 0, 0, 0], settings.grpc_port));
    let mut builder = tonic::transport::Server::builder();
    match load_server_tls(&settings.cert_path, &settings.key_path, &settings.tls_ca_path).await {
        Ok(tls) => {
            builder = builder.tls_config(tls)?;
            tracing::info!("gRPC surface secured with mutual TLS");
        }
        Err(err) => {
            tracing::warn!(error = %err, "server TLS material unavailable, serving plaintext");
        }
    }

    tracing::info!(addr = %grpc_addr, "gRPC listening");
    builder
        .add_service(TelephonyActionServiceServer::new(TelephonyServer::new(pipeline)))
        .serve_with_shutdown(grpc_addr, shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn build_pipeline(settings: &Settings, clients: &Clients) -> Arc<CallPipeline> {
    let config = EngineConfig {
        sample_rate: settings.pipeline_sample_rate,
        barge_in_min_chars: settings.barge_in_min_chars,
        default_voice: settings.default_tts_voice.clone(),
        fallback_audio_path: PathBuf::from(&settings.fallback_audio_path),
    };
    Arc::new(CallPipeline::new(
        Arc::new(GrpcMediaGateway::new(clients.media.clone())),
        Arc::new(GrpcSttGateway::new(clients.stt.clone())),
        Arc::new(GrpcDialogGateway::new(clients.dialog.clone())),
        Arc::new(GrpcTtsGateway::new(clients.tts.clone())),
        config,
    ))
}

fn init_tracing(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level));

    let fmt_layer = if settings.is_production() {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Wait for shutdown signal (ctrl-c or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received ctrl-c, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
