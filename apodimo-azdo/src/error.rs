//! Error types for Azure DevOps operations

use thiserror::Error;

/// Result type for Azure DevOps operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to Azure DevOps
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure
    #[error("Azure DevOps request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Azure DevOps returned {status} for {path}: {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    /// Token rejected (Azure DevOps answers 203 with a sign-in page)
    #[error("Azure DevOps authentication failed for {0}; check the personal access token")]
    Auth(String),

    /// Invalid organization URL
    #[error("Invalid Azure DevOps URL: {0}")]
    Url(#[from] url::ParseError),

    /// Unexpected response body
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<Error> for apodimo_core::Error {
    fn from(err: Error) -> Self {
        apodimo_core::Error::Source(err.to_string())
    }
}
