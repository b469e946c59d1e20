//! Configuration for the callflow service
//!
//! Everything comes from environment variables (the deployment contract of
//! the surrounding platform); defaults cover local development. mTLS
//! material paths are required: the process refuses to start without them,
//! although the files themselves may be absent (the transport layer then
//! falls back to plaintext with a warning).

pub mod settings;

pub use settings::Settings;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable is not set: {0}")]
    MissingVar(&'static str),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
