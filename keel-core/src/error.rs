//! Error types for core primitives.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Hash decoding failed.
    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidHash(e.to_string())
    }
}
