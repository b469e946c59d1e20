//! Server-side mutual TLS material.

use tonic::transport::{Certificate, Identity, ServerTlsConfig};

/// Load the server identity and the client CA. Setting the client CA root
/// makes tonic require and verify client certificates, which is the mutual
/// part of the contract. Unreadable files are an error; the caller decides
/// whether to serve plaintext instead.
pub async fn load_server_tls(
    cert_path: &str,
    key_path: &str,
    ca_path: &str,
) -> Result<ServerTlsConfig, std::io::Error> {
    let cert = tokio::fs::read(cert_path).await?;
    let key = tokio::fs::read(key_path).await?;
    let ca = tokio::fs::read(ca_path).await?;

    Ok(ServerTlsConfig::new()
        .identity(Identity::from_pem(cert, key))
        .client_ca_root(Certificate::from_pem(ca)))
}
