//! Error types for the canary pipeline

use thiserror::Error;

/// Result type alias for the canary pipeline
pub type Result<T> = std::result::Result<T, CanaryError>;

/// Main error type for the canary pipeline
#[derive(Error, Debug)]
pub enum CanaryError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Record store errors
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics backend errors
    #[error("Metrics backend error: {0}")]
    Metrics(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}
