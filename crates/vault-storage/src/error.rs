//! Storage error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage medium error.
///
/// Every variant means the same thing to the session provider: storage
/// access failed. The split exists for logs and for adapter tests.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or not reachable from this execution context.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file exists but does not hold a cookie jar.
    #[error("corrupt cookie jar {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The medium refused the cookie (bad name, value, or header).
    #[error("cookie rejected: {0}")]
    Rejected(String),
}

impl StorageError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
