//! Error types for Apodimo

use thiserror::Error;

/// Result type alias for Apodimo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Apodimo operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Azure DevOps request failed
    #[error("Azure DevOps error: {0}")]
    Source(String),

    /// GitHub request failed
    #[error("GitHub error: {0}")]
    Destination(String),

    /// Git mirror clone/push failed
    #[error("Git error: {0}")]
    Git(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::Git(err.message().to_string())
    }
}
