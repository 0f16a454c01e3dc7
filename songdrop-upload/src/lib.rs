//! # songdrop-upload: media submission orchestrator
//!
//! Persists one media item (an audio file, a cover image and descriptive
//! metadata) as a single logical unit across two independent stores.
//!
//! ```text
//! validate ─▶ upload audio ─▶ upload image ─▶ insert metadata ─▶ Success
//!    │             │               │                 │
//!    ▼             ▼               ▼                 ▼
//! Failure       Failure      delete audio      delete audio+image
//! (no I/O)   (nothing to        Failure              Failure
//!              undo)
//! ```
//!
//! The metadata record is written last and only after both blobs are
//! stored, so a visible record never points at a missing blob. When a
//! later step fails the blobs already written are deleted on a best-effort
//! basis; a failed delete is logged and the caller still sees the original
//! failure.
//!
//! ```rust
//! use songdrop_upload::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let orchestrator = UploadOrchestrator::new(MemoryBlobStore::new(), MemoryMetadataStore::new());
//!
//! let request = UploadRequest::builder()
//!     .owner(OwnerId::new("user-123"))
//!     .title("Blue Train")
//!     .author("John Coltrane")
//!     .audio(BlobPayload::new(&b"ID3"[..], "audio/mpeg"))
//!     .image(BlobPayload::new(&b"\x89PNG"[..], "image/png"))
//!     .build();
//!
//! match orchestrator.submit(request).await {
//!     UploadOutcome::Success { record } => println!("stored {}", record.id),
//!     UploadOutcome::Failure { stage, reason } => eprintln!("{stage}: {reason}"),
//! }
//! # }
//! ```

mod compensate;
pub mod config;
mod error;
mod library;
mod metadata;
mod orchestrator;
mod outcome;
mod request;
pub mod telemetry;
mod validate;

pub use compensate::compensate;
pub use config::{UploadConfig, UploadConfigSnapshot, DEFAULT_ENV_PREFIX};
pub use error::{
    CompensationFailure, ErrorKind, Field, StoreError, UploadError, ValidationError,
};
pub use library::{LibraryEntry, MediaLibrary};
pub use metadata::{
    MemoryMetadataStore, MetadataError, MetadataRecord, MetadataResult, MetadataStore, NewRecord,
    RecordId,
};
pub use orchestrator::UploadOrchestrator;
pub use outcome::{Stage, UploadFailure, UploadOutcome};
pub use request::{OwnerId, UploadRequest, UploadRequestBuilder};
pub use validate::{AllowList, Validated, Validator, DEFAULT_AUDIO_TYPES, DEFAULT_IMAGE_TYPES};

pub use songdrop_blob;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        MemoryMetadataStore, MetadataRecord, MetadataStore, OwnerId, Stage, UploadError,
        UploadOrchestrator, UploadOutcome, UploadRequest, ValidationError, Validator,
    };
    pub use songdrop_blob::{BlobPayload, BlobStore, MemoryBlobStore, Namespace};
}
