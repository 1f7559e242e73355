//! Storage error types.

use docket_core::{DocketError, DocumentKey, Namespace};
use thiserror::Error;

/// Result type alias using [`StorageError`].
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by a [`StorageClient`](crate::StorageClient).
#[derive(Debug, Error)]
pub enum StorageError {
    /// No value is stored under the key.
    #[error("key '{key}' not found in namespace '{namespace}'")]
    NotFound {
        /// Namespace that was searched.
        namespace: String,
        /// Key that was not found.
        key: String,
    },

    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// I/O error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Creates a not-found error for a namespace/key pair.
    #[must_use]
    pub fn not_found(namespace: &Namespace, key: &DocumentKey) -> Self {
        Self::NotFound {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }

    /// Returns true if this is the not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StorageError> for DocketError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound { namespace, key } => DocketError::not_found(namespace, key),
            StorageError::Unavailable(message) => DocketError::backend(message),
            StorageError::Io(source) => {
                DocketError::backend_with_source("storage I/O failed", source)
            }
        }
    }
}
