//! HTTP sidecar: the health endpoint.

use axum::routing::get;
use axum::Router;

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_says_ok() {
        assert_eq!(health().await, "OK");
    }
}
