//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key cannot be mapped onto the backend.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend error.
    #[error("backend error: {0}")]
    Backend(String),
}
