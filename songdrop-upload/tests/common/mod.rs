#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use songdrop_upload::songdrop_blob::{
    BlobError, BlobKeyStrategy, BlobPath, BlobPayload, BlobResult, BlobStore, MemoryBlobStore,
    Namespace,
};
use songdrop_upload::{
    MemoryMetadataStore, MetadataError, MetadataRecord, MetadataResult, MetadataStore, NewRecord,
    OwnerId, UploadRequest,
};

/// Test factory functions
pub fn mp3() -> BlobPayload {
    BlobPayload::new(&b"ID3\x04\x00"[..], "audio/mpeg")
}

pub fn png() -> BlobPayload {
    BlobPayload::new(&b"\x89PNG\r\n"[..], "image/png")
}

pub fn request(title: &str, author: &str) -> UploadRequest {
    UploadRequest::builder()
        .owner(OwnerId::new("user-1"))
        .title(title)
        .author(author)
        .audio(mp3())
        .image(png())
        .build()
}

#[derive(Default)]
struct BlobScript {
    uploads: Vec<(Namespace, String)>,
    deletes: Vec<(Namespace, BlobPath)>,
    failing_uploads: HashSet<Namespace>,
    timing_out_uploads: HashSet<Namespace>,
    upload_delays: HashMap<Namespace, Duration>,
    failing_deletes: bool,
}

/// Blob store double: records every call, fails on demand, stores the rest
/// in a real in-memory store
#[derive(Clone, Default)]
pub struct ScriptedBlobStore {
    pub inner: MemoryBlobStore,
    script: Arc<Mutex<BlobScript>>,
}

impl ScriptedBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh script over existing store contents
    pub fn over(inner: MemoryBlobStore) -> Self {
        Self {
            inner,
            script: Arc::default(),
        }
    }

    pub fn fail_uploads_to(self, namespace: Namespace) -> Self {
        self.script.lock().failing_uploads.insert(namespace);
        self
    }

    pub fn time_out_uploads_to(self, namespace: Namespace) -> Self {
        self.script.lock().timing_out_uploads.insert(namespace);
        self
    }

    pub fn delay_uploads_to(self, namespace: Namespace, delay: Duration) -> Self {
        self.script.lock().upload_delays.insert(namespace, delay);
        self
    }

    pub fn fail_deletes(self) -> Self {
        self.script.lock().failing_deletes = true;
        self
    }

    pub fn upload_calls(&self) -> Vec<(Namespace, String)> {
        self.script.lock().uploads.clone()
    }

    pub fn delete_calls(&self) -> Vec<(Namespace, BlobPath)> {
        self.script.lock().deletes.clone()
    }

    pub fn call_count(&self) -> usize {
        let script = self.script.lock();
        script.uploads.len() + script.deletes.len()
    }
}

#[async_trait]
impl BlobStore for ScriptedBlobStore {
    async fn upload(
        &self,
        namespace: Namespace,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> BlobResult<BlobPath> {
        let (delay, fail, time_out) = {
            let mut script = self.script.lock();
            script.uploads.push((namespace, key.to_string()));
            (
                script.upload_delays.get(&namespace).copied(),
                script.failing_uploads.contains(&namespace),
                script.timing_out_uploads.contains(&namespace),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if time_out {
            return Err(BlobError::timeout(format!("upload {}", key)));
        }
        if fail {
            return Err(BlobError::backend(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        self.inner.upload(namespace, key, body, content_type).await
    }

    async fn delete(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<()> {
        let fail = {
            let mut script = self.script.lock();
            script.deletes.push((namespace, path.clone()));
            script.failing_deletes
        };

        if fail {
            return Err(BlobError::backend(std::io::Error::new(
                std::io::ErrorKind::Other,
                "delete refused",
            )));
        }
        self.inner.delete(namespace, path).await
    }

    async fn public_url(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<String> {
        self.inner.public_url(namespace, path).await
    }
}

#[derive(Default)]
struct MetadataScript {
    inserts: Vec<NewRecord>,
    blobs_present_at_insert: Vec<bool>,
    failing: bool,
    rejecting: bool,
}

/// Metadata store double that also checks, at insert time, that both
/// referenced blobs really are in the blob store
#[derive(Clone)]
pub struct ScriptedMetadataStore {
    pub inner: MemoryMetadataStore,
    blobs: MemoryBlobStore,
    script: Arc<Mutex<MetadataScript>>,
}

impl ScriptedMetadataStore {
    pub fn watching(blobs: &ScriptedBlobStore) -> Self {
        Self {
            inner: MemoryMetadataStore::new(),
            blobs: blobs.inner.clone(),
            script: Arc::default(),
        }
    }

    pub fn failing(self) -> Self {
        self.script.lock().failing = true;
        self
    }

    pub fn rejecting(self) -> Self {
        self.script.lock().rejecting = true;
        self
    }

    pub fn insert_calls(&self) -> Vec<NewRecord> {
        self.script.lock().inserts.clone()
    }

    pub fn blobs_present_at_insert(&self) -> Vec<bool> {
        self.script.lock().blobs_present_at_insert.clone()
    }

    pub fn records(&self) -> Vec<MetadataRecord> {
        self.inner.records()
    }
}

#[async_trait]
impl MetadataStore for ScriptedMetadataStore {
    async fn insert(&self, record: NewRecord) -> MetadataResult<MetadataRecord> {
        let fail = {
            let mut script = self.script.lock();
            let present = self.blobs.contains(Namespace::Audio, &record.audio_path)
                && self.blobs.contains(Namespace::Image, &record.image_path);
            script.inserts.push(record.clone());
            script.blobs_present_at_insert.push(present);
            (script.failing, script.rejecting)
        };

        match fail {
            (true, _) => return Err(MetadataError::unavailable("songs table is read-only")),
            (_, true) => return Err(MetadataError::rejected("title already in library")),
            _ => {}
        }
        self.inner.insert(record).await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> MetadataResult<Vec<MetadataRecord>> {
        self.inner.list_by_owner(owner).await
    }
}

/// Always hands out the same suffix, to force key collisions
#[derive(Debug, Clone)]
pub struct FixedSuffix(pub &'static str);

impl BlobKeyStrategy for FixedSuffix {
    fn unique_suffix(&self) -> String {
        self.0.to_string()
    }
}
