//! Error types for chatrelay.

use thiserror::Error;

/// Common error type for chatrelay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Inbound message rejected before routing.
    ///
    /// Covers an absent payload, an empty sender, an unknown command
    /// destination and payloads that do not deserialize into a message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::InvalidMessage(e.to_string())
    }
}

/// Result type alias for chatrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
