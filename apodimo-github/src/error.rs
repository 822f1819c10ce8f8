//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Request sent outside octocrab failed
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status on a request sent outside octocrab
    #[error("GitHub returned {status} for {route}: {message}")]
    Status {
        status: u16,
        route: String,
        message: String,
    },

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Rate limit exceeded
    #[error("GitHub rate limit exceeded: {0}")]
    RateLimited(String),

    /// Invalid API URL
    #[error("Invalid GitHub API URL: {0}")]
    Url(String),
}

impl Error {
    /// Classify an octocrab error by the message GitHub sent back
    pub(crate) fn from_api(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("Bad credentials") =>
            {
                Error::Auth("Invalid GitHub token".to_string())
            }
            octocrab::Error::GitHub { source, .. }
                if source.message.to_lowercase().contains("rate limit") =>
            {
                Error::RateLimited(source.message)
            }
            other => Error::Api(other),
        }
    }
}

impl From<Error> for apodimo_core::Error {
    fn from(err: Error) -> Self {
        apodimo_core::Error::Destination(err.to_string())
    }
}
