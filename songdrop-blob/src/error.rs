use thiserror::Error;

use crate::Namespace;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during blob operations
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Blob not found: {namespace}/{path}")]
    NotFound { namespace: Namespace, path: String },

    #[error("Blob already exists: {namespace}/{key}")]
    Conflict { namespace: Namespace, key: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Blob of {size} bytes exceeds maximum {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("Timed out during {operation}")]
    Timeout { operation: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BlobError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(namespace: Namespace, path: S) -> Self {
        Self::NotFound {
            namespace,
            path: path.into(),
        }
    }

    pub fn conflict<S: Into<String>>(namespace: Namespace, key: S) -> Self {
        Self::Conflict {
            namespace,
            key: key.into(),
        }
    }

    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Backend and timeout failures may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Backend { .. })
    }
}
