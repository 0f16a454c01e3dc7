use serde::Serialize;
use songdrop_blob::{BlobStore, Namespace};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::{MetadataRecord, MetadataStore, OwnerId, StoreError};

/// A stored media item with a fetchable cover image URL
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub record: MetadataRecord,
    /// `None` when the store could not resolve the cover; show a placeholder
    pub cover_url: Option<String>,
}

/// Lists what an owner has uploaded
#[derive(Clone)]
pub struct MediaLibrary {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
}

impl MediaLibrary {
    pub fn new(blobs: Arc<dyn BlobStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self { blobs, metadata }
    }

    /// Newest first. An owner with nothing uploaded gets an empty list.
    #[instrument(name = "library.list", skip_all, fields(owner = %owner))]
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<LibraryEntry>, StoreError> {
        let records = self.metadata.list_by_owner(owner).await?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let cover_url = match self.blobs.public_url(Namespace::Image, &record.image_path).await {
                Ok(url) => Some(url),
                Err(err) => {
                    warn!(record = %record.id, error = %err, "cover url unavailable");
                    None
                }
            };
            entries.push(LibraryEntry { record, cover_url });
        }

        Ok(entries)
    }
}
