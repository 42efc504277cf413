//! Remote config API error definitions.

use thiserror::Error;

/// Errors talking to the remote config API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Connection refused, DNS failure, timeout.
    #[error("remote config API unavailable: {0}")]
    Unavailable(String),

    /// Response was not well-formed or not shaped as expected.
    #[error("remote config API protocol error: {0}")]
    Protocol(String),

    /// Remote answered with a non-success status.
    #[error("remote config API rejected request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// Configured base URL cannot address config paths.
    #[error("invalid remote config URL '{0}'")]
    InvalidUrl(String),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Unavailable(format!("request timed out: {}", e))
        } else if e.is_decode() {
            RemoteError::Protocol(e.to_string())
        } else {
            RemoteError::Unavailable(e.to_string())
        }
    }
}
