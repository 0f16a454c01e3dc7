use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use songdrop_blob::BlobPath;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::OwnerId;

pub type MetadataResult<T> = Result<T, MetadataError>;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Timed out during {operation}")]
    Timeout { operation: String },

    #[error("Record rejected: {message}")]
    Rejected { message: String },

    #[error("Metadata backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MetadataError {
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn rejected<S: Into<String>>(message: S) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Store-assigned identifier of a metadata record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the orchestrator hands to `MetadataStore::insert`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub owner: OwnerId,
    pub title: String,
    pub author: String,
    pub audio_path: BlobPath,
    pub image_path: BlobPath,
}

/// Durable record of a submitted media item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: RecordId,
    pub owner: OwnerId,
    pub title: String,
    pub author: String,
    pub audio_path: BlobPath,
    pub image_path: BlobPath,
    pub created_at: DateTime<Utc>,
}

impl MetadataRecord {
    /// Stamp a new record with an id and creation time
    pub fn from_new(new: NewRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            owner: new.owner,
            title: new.title,
            author: new.author,
            audio_path: new.audio_path,
            image_path: new.image_path,
            created_at,
        }
    }
}

/// Metadata persistence the orchestrator commits to last
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a record referencing two already-stored blobs
    async fn insert(&self, record: NewRecord) -> MetadataResult<MetadataRecord>;

    /// All records for `owner`, newest first
    async fn list_by_owner(&self, owner: &OwnerId) -> MetadataResult<Vec<MetadataRecord>>;
}

/// Thread-safe in-process metadata store
#[derive(Clone, Default)]
pub struct MemoryMetadataStore {
    records: Arc<RwLock<Vec<MetadataRecord>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetadataRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn insert(&self, record: NewRecord) -> MetadataResult<MetadataRecord> {
        let mut records = self.records.write();
        // stamped under the lock so insertion order matches created_at
        let record = MetadataRecord::from_new(record, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> MetadataResult<Vec<MetadataRecord>> {
        let records = self.records.read();
        // insertion order is creation order
        Ok(records
            .iter()
            .rev()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect())
    }
}
