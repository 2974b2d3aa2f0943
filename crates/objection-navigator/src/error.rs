//! Error types for service startup
//!
//! Request-time failures never surface through these types: validation and
//! credential problems become [`crate::handler::ApiError`], and completion
//! problems are absorbed by the fallback.

use thiserror::Error;

/// Errors raised while loading configuration or assembling the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration values are out of range or malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file access error
    #[error("File error: {0}")]
    FileError(String),

    /// Configuration parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// The completion client could not be constructed
    #[error("Completion client error: {0}")]
    Client(#[from] crate::client::CompletionError),
}

impl ServiceError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ServiceError::InvalidConfig(msg.into())
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        ServiceError::ParseError(msg.into())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ServiceError {
    fn from(err: serde_yaml::Error) -> Self {
        ServiceError::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for startup operations
pub type Result<T> = std::result::Result<T, ServiceError>;
