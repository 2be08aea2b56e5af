use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing a key.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key is empty or contains characters that cannot name a file.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Stored value is not valid UTF-8.
    #[error("Value for key {key:?} is not valid UTF-8")]
    NotUtf8 {
        /// Offending key.
        key: String,
    },

    /// I/O operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Failed to acquire the in-memory lock.
    #[error("Store lock error")]
    LockError,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
