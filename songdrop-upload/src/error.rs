//! # Errors
//!
//! Three families, by who can act on them:
//! - [`ValidationError`]: user-correctable, raised before any store call
//! - [`StoreError`]: a blob or metadata store failed at a given stage
//! - [`CompensationFailure`]: a cleanup delete failed; logged, never returned
//!
//! Every caller-visible error maps to an [`ErrorKind`] carrying a status code
//! and a stable name so transports can render it without matching on store
//! internals.

use std::fmt;

use serde::{Deserialize, Serialize};
use songdrop_blob::{BlobError, BlobPath, Namespace};
use thiserror::Error;

use crate::metadata::MetadataError;

/// Error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,       // 400
    NotAuthenticated, // 401
    NotFound,         // 404
    Timeout,          // 408
    Conflict,         // 409
    Unprocessable,    // 422
    GeneralError,     // 500
    BadGateway,       // 502
    Unavailable,      // 503
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Timeout => 408,
            ErrorKind::Conflict => 409,
            ErrorKind::Unprocessable => 422,
            ErrorKind::GeneralError => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::Unavailable => 503,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::BadGateway => "BadGateway",
            ErrorKind::Unavailable => "Unavailable",
        }
    }

    /// Kebab-cased class name
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::BadGateway => "bad-gateway",
            ErrorKind::Unavailable => "unavailable",
        }
    }
}

/// Request field a validation error points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Author,
    Audio,
    Image,
    Owner,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Audio => "audio",
            Field::Image => "image",
            Field::Owner => "owner",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: Field },

    #[error("{field} file type '{content_type}' is not allowed")]
    UnsupportedType { field: Field, content_type: String },

    #[error("{field} file of {size} bytes exceeds maximum {max}")]
    TooLarge { field: Field, size: u64, max: u64 },

    /// The caller context supplied no owner. A caller bug, not a user error.
    #[error("no authenticated owner in caller context")]
    MissingOwner,
}

impl ValidationError {
    pub fn missing(field: Field) -> Self {
        Self::Missing { field }
    }

    pub fn field(&self) -> Field {
        match self {
            Self::Missing { field }
            | Self::UnsupportedType { field, .. }
            | Self::TooLarge { field, .. } => *field,
            Self::MissingOwner => Field::Owner,
        }
    }

    /// True when the caller, not the user, broke the contract
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingOwner)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Missing { .. } => ErrorKind::BadRequest,
            Self::UnsupportedType { .. } | Self::TooLarge { .. } => ErrorKind::Unprocessable,
            Self::MissingOwner => ErrorKind::NotAuthenticated,
        }
    }
}

/// Failure reported by one of the external stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Blob(e) => e.is_timeout(),
            Self::Metadata(e) => e.is_timeout(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Blob(BlobError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Blob(BlobError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Blob(BlobError::Invalid { .. }) => ErrorKind::BadRequest,
            Self::Blob(BlobError::TooLarge { .. }) => ErrorKind::Unprocessable,
            Self::Blob(BlobError::Timeout { .. }) => ErrorKind::Timeout,
            Self::Blob(BlobError::Backend { .. }) => ErrorKind::BadGateway,
            Self::Metadata(MetadataError::Timeout { .. }) => ErrorKind::Timeout,
            Self::Metadata(MetadataError::Unavailable { .. }) => ErrorKind::Unavailable,
            Self::Metadata(MetadataError::Rejected { .. }) => ErrorKind::Unprocessable,
            Self::Metadata(MetadataError::Backend { .. }) => ErrorKind::BadGateway,
        }
    }
}

/// Reason half of a failed [`UploadOutcome`](crate::UploadOutcome)
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The runtime shut down before the submission task finished
    #[error("submission interrupted: {message}")]
    Interrupted { message: String },
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::Interrupted { .. } => ErrorKind::GeneralError,
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BlobError> for UploadError {
    fn from(err: BlobError) -> Self {
        Self::Store(StoreError::Blob(err))
    }
}

impl From<MetadataError> for UploadError {
    fn from(err: MetadataError) -> Self {
        Self::Store(StoreError::Metadata(err))
    }
}

/// A compensating delete that did not go through.
///
/// Only ever logged; it never changes the outcome of a submission.
#[derive(Error, Debug)]
#[error("compensating delete of {namespace}/{path} failed: {source}")]
pub struct CompensationFailure {
    pub namespace: Namespace,
    pub path: BlobPath,
    #[source]
    pub source: BlobError,
}
