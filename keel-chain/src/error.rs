//! Error types for chain index operations.

use thiserror::Error;

/// Result type for chain index operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur while reading chain state.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The backing store failed to answer a read.
    #[error("chain storage error: {0}")]
    Storage(String),

    /// Block or transaction encoding failed.
    #[error("chain codec error: {0}")]
    Codec(String),
}

impl From<bincode::Error> for ChainError {
    fn from(e: bincode::Error) -> Self {
        ChainError::Codec(e.to_string())
    }
}
