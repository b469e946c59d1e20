//! Upstream gRPC clients for the callflow service
//!
//! Dials the media, STT, TTS, dialog and SIP signaling services over
//! lazily-connected tonic channels, with mutual TLS when the configured
//! material is readable and plaintext otherwise. The gateway modules adapt
//! the generated clients to the seams in `callflow_core::traits`.

pub mod dialog;
pub mod media;
pub mod stt;
pub mod tls;
pub mod tts;

pub use dialog::GrpcDialogGateway;
pub use media::GrpcMediaGateway;
pub use stt::GrpcSttGateway;
pub use tts::GrpcTtsGateway;

use thiserror::Error;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::Request;

use callflow_config::Settings;
use callflow_contracts::dialog::dialog_service_client::DialogServiceClient;
use callflow_contracts::media::media_service_client::MediaServiceClient;
use callflow_contracts::sip::sip_signaling_service_client::SipSignalingServiceClient;
use callflow_contracts::stt::stt_gateway_service_client::SttGatewayServiceClient;
use callflow_contracts::tts::tts_gateway_service_client::TtsGatewayServiceClient;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid upstream target {target}: {message}")]
    InvalidTarget { target: String, message: String },

    #[error("transport setup failed: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// The process-wide upstream client set. Channels multiplex, so the set is
/// built once at startup and cloned per call.
#[derive(Clone)]
pub struct Clients {
    pub media: MediaServiceClient<Channel>,
    pub stt: SttGatewayServiceClient<Channel>,
    pub tts: TtsGatewayServiceClient<Channel>,
    pub dialog: DialogServiceClient<Channel>,
    pub signaling: SipSignalingServiceClient<Channel>,
}

impl Clients {
    /// Dial every upstream. Channels connect lazily, so a down dependency
    /// does not block startup; its calls fail when first used.
    pub async fn connect(settings: &Settings) -> Result<Self, ClientError> {
        let tls = match tls::load_client_tls(
            &settings.cert_path,
            &settings.key_path,
            &settings.tls_ca_path,
        )
        .await
        {
            Ok(cfg) => {
                tracing::info!("dialing upstreams with mutual TLS");
                Some(cfg)
            }
            Err(err) => {
                tracing::warn!(error = %err, "client TLS material unavailable, dialing upstreams in plaintext");
                None
            }
        };

        Ok(Self {
            media: MediaServiceClient::new(channel(&settings.media_url, tls.as_ref())?),
            stt: SttGatewayServiceClient::new(channel(&settings.stt_url, tls.as_ref())?),
            tts: TtsGatewayServiceClient::new(channel(&settings.tts_url, tls.as_ref())?),
            dialog: DialogServiceClient::new(channel(&settings.dialog_url, tls.as_ref())?),
            signaling: SipSignalingServiceClient::new(channel(&settings.sip_url, tls.as_ref())?),
        })
    }
}

fn channel(target: &str, tls: Option<&ClientTlsConfig>) -> Result<Channel, ClientError> {
    let scheme = if tls.is_some() { "https" } else { "http" };
    let uri = format!("{scheme}://{target}");
    let mut endpoint = Endpoint::from_shared(uri).map_err(|err| ClientError::InvalidTarget {
        target: target.to_string(),
        message: err.to_string(),
    })?;
    if let Some(cfg) = tls {
        endpoint = endpoint.tls_config(cfg.clone())?;
    }
    Ok(endpoint.connect_lazy())
}

/// Wrap a request message (or stream) with the `x-trace-id` header. A trace
/// id that is not valid ASCII metadata is dropped rather than failing the
/// call.
pub(crate) fn traced_request<T>(message: T, trace_id: &str) -> Request<T> {
    let mut request = Request::new(message);
    if let Ok(value) = MetadataValue::try_from(trace_id) {
        request.metadata_mut().insert("x-trace-id", value);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traced_request_carries_the_session_id() {
        let request = traced_request((), "session-42");
        assert_eq!(
            request.metadata().get("x-trace-id").unwrap(),
            &MetadataValue::try_from("session-42").unwrap()
        );
    }

    #[test]
    fn invalid_trace_ids_are_dropped_not_fatal() {
        let request = traced_request((), "sessión");
        assert!(request.metadata().get("x-trace-id").is_none());
    }

    #[tokio::test]
    async fn plaintext_channel_builds_from_bare_host_port() {
        assert!(channel("media-service:13031", None).is_ok());
    }
}
