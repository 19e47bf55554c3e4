//! Error types for notarisation lookups.

use thiserror::Error;

/// Result type for notarisation lookups.
pub type Result<T> = std::result::Result<T, NotaryError>;

/// Errors that can occur while reading the notarisation index.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// The backing store failed to answer a read.
    #[error("notarisation storage error: {0}")]
    Storage(String),
}
