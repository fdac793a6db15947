//! Cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur when using cache storage.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Bucket name cannot be used as a storage location.
    #[error("invalid bucket name: {0}")]
    InvalidBucket(String),

    /// Failed to serialize or deserialize an entry.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure in a persistent backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored entry could not be turned back into a response.
    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
}
