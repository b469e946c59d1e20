//! Client-side mutual TLS material.

use tonic::transport::{Certificate, ClientTlsConfig, Identity};

/// Load the client identity and the shared CA. Any unreadable file is an
/// error; the caller decides whether to fall back to plaintext.
pub async fn load_client_tls(
    cert_path: &str,
    key_path: &str,
    ca_path: &str,
) -> Result<ClientTlsConfig, std::io::Error> {
    let cert = tokio::fs::read(cert_path).await?;
    let key = tokio::fs::read(key_path).await?;
    let ca = tokio::fs::read(ca_path).await?;

    Ok(ClientTlsConfig::new()
        .identity(Identity::from_pem(cert, key))
        .ca_certificate(Certificate::from_pem(ca)))
}
