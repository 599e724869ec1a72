//! Client error types.

use thiserror::Error;

/// Failure kinds surfaced by the chat and transcription calls.
///
/// Cancellation is a distinct variant rather than a string-typed sentinel
/// so callers can branch on it at the type level.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Pre-flight check failed; no network attempt was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The endpoint rejected the credentials (HTTP 401).
    #[error("authentication failed, check the API token")]
    Auth,

    /// The endpoint failed on its side (HTTP 5xx).
    #[error("server error (status {status})")]
    Server { status: u16 },

    /// The request never produced a readable, decodable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The user cancelled the exchange. Not a failure from the caller's
    /// point of view; the reply ends in the `abort` status.
    #[error("exchange cancelled")]
    Cancelled,

    /// Anything the other kinds do not cover.
    #[error("{0}")]
    Unknown(String),
}

impl ClientError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_detection() {
        assert!(ClientError::Cancelled.is_cancellation());
        assert!(!ClientError::Auth.is_cancellation());
        assert!(!ClientError::Unknown("x".to_string()).is_cancellation());
    }
}
