use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::{BlobConfig, BlobError, BlobPath, BlobResult, BlobStore, Namespace};

/// A blob held by [`MemoryBlobStore`]
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Thread-safe in-process blob store, for tests and local development
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<(Namespace, String), StoredBlob>>>,
    config: BlobConfig,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BlobConfig) -> Self {
        Self {
            objects: Arc::default(),
            config,
        }
    }

    fn path_for(namespace: Namespace, key: &str) -> BlobPath {
        BlobPath::new(format!("{}/{}", namespace, key))
    }

    pub fn get(&self, namespace: Namespace, path: &BlobPath) -> Option<StoredBlob> {
        self.objects
            .read()
            .get(&(namespace, path.as_str().to_string()))
            .cloned()
    }

    pub fn contains(&self, namespace: Namespace, path: &BlobPath) -> bool {
        self.objects
            .read()
            .contains_key(&(namespace, path.as_str().to_string()))
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        namespace: Namespace,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> BlobResult<BlobPath> {
        let size = body.len() as u64;
        if size > self.config.max_blob_bytes {
            return Err(BlobError::TooLarge {
                size,
                max: self.config.max_blob_bytes,
            });
        }

        let path = Self::path_for(namespace, key);
        debug!(namespace = %namespace, key, size, "memory put");
        let mut objects = self.objects.write();
        let slot = (namespace, path.as_str().to_string());
        if objects.contains_key(&slot) {
            return Err(BlobError::conflict(namespace, key));
        }
        objects.insert(
            slot,
            StoredBlob {
                bytes: body,
                content_type: content_type.to_string(),
            },
        );

        Ok(path)
    }

    async fn delete(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<()> {
        debug!(namespace = %namespace, path = %path, "memory delete");
        self.objects
            .write()
            .remove(&(namespace, path.as_str().to_string()))
            .map(|_| ())
            .ok_or_else(|| BlobError::not_found(namespace, path.as_str()))
    }

    async fn public_url(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<String> {
        if !self.contains(namespace, path) {
            return Err(BlobError::not_found(namespace, path.as_str()));
        }
        Ok(format!("memory://{}", path))
    }
}
