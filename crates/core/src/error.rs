//! Error types for the tickstream system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tickstream system.
#[derive(Error, Debug)]
pub enum Error {
    /// A partition file is malformed or unreadable.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A source configuration is invalid (e.g. resolves to zero files).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A requested time range is invalid.
    #[error("Range error: {0}")]
    Range(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a range error.
    pub fn range(msg: impl Into<String>) -> Self {
        Error::Range(msg.into())
    }
}
