use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::{BlobPath, BlobResult, Namespace};

/// Core blob storage operations - must be implemented by all storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key` inside `namespace`, returning the store-assigned path.
    ///
    /// Implementations must not overwrite an existing key; they report
    /// `BlobError::Conflict` instead.
    async fn upload(
        &self,
        namespace: Namespace,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> BlobResult<BlobPath>;

    /// Delete a previously uploaded blob
    async fn delete(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<()>;

    /// URL a client can fetch the blob from
    async fn public_url(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<String>;
}

/// Strategy for generating blob keys
pub trait BlobKeyStrategy: Send + Sync {
    /// Fresh suffix for one submission; shared by every key in that submission
    fn unique_suffix(&self) -> String;

    /// Build the key for a blob in `namespace`
    fn object_key(&self, namespace: Namespace, title: &str, suffix: &str) -> String {
        format!("{}-{}-{}", namespace, sanitize_title(title), suffix)
    }
}

/// Default key strategy: `{namespace}-{title}-{uuid}`
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyStrategy;

impl BlobKeyStrategy for DefaultKeyStrategy {
    fn unique_suffix(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Keep a title from escaping its namespace when embedded in a key
pub fn sanitize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_object_key_format() {
        let keys = DefaultKeyStrategy;
        assert_eq!(
            keys.object_key(Namespace::Audio, "Blue Train", "abc123"),
            "audio-Blue Train-abc123"
        );
        assert_eq!(
            keys.object_key(Namespace::Image, "Blue Train", "abc123"),
            "image-Blue Train-abc123"
        );
    }

    #[test]
    fn test_title_cannot_escape_namespace() {
        assert_eq!(sanitize_title(" ../etc/passwd "), ".._etc_passwd");
        assert_eq!(sanitize_title("a\\b\nc"), "a_b_c");
    }

    #[test]
    fn test_suffixes_do_not_repeat() {
        let keys = DefaultKeyStrategy;
        let suffixes: HashSet<String> = (0..1000).map(|_| keys.unique_suffix()).collect();
        assert_eq!(suffixes.len(), 1000);
        assert!(suffixes.iter().all(|s| s.len() == 32));
    }
}
