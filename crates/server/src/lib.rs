//! Callflow server
//!
//! Serves the telephony action surface over gRPC (mutual TLS when the
//! material is present) and a plain HTTP health endpoint.

pub mod grpc;
pub mod http;
pub mod tls;

pub use grpc::TelephonyServer;
pub use http::health_router;
pub use tls::load_server_tls;
