//! # songdrop-blob: namespaced blob storage for songdrop
//!
//! `songdrop-blob` holds the blob side of a media submission: the
//! [`BlobStore`] collaborator trait the upload orchestrator drives, the
//! [`BlobKeyStrategy`] that keeps keys unique per submission, and two stores.
//!
//! ```rust
//! use songdrop_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let store = MemoryBlobStore::new();
//! let keys = DefaultKeyStrategy;
//!
//! let suffix = keys.unique_suffix();
//! let key = keys.object_key(Namespace::Audio, "Blue Train", &suffix);
//!
//! let path = store
//!     .upload(Namespace::Audio, &key, bytes::Bytes::from_static(b"ID3"), "audio/mpeg")
//!     .await?;
//! store.delete(Namespace::Audio, &path).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Stores
//!
//! - [`MemoryBlobStore`]: in-process, for tests and local runs
//! - [`S3CompatibleStore`]: any S3-compatible endpoint, one bucket per namespace
//!
//! Neither store overwrites an existing key.

mod config;
mod error;
mod memory;
mod s3_store;
pub mod store;
mod types;

pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use memory::{MemoryBlobStore, StoredBlob};
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{sanitize_title, BlobKeyStrategy, BlobStore, DefaultKeyStrategy};
pub use types::{BlobPath, BlobPayload, BlobRef, Namespace};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobConfig, BlobError, BlobKeyStrategy, BlobPath, BlobPayload, BlobRef, BlobResult,
        BlobStore, DefaultKeyStrategy, MemoryBlobStore, Namespace,
    };
}
