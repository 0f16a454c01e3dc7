use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BlobError;

/// Logical partition of the blob store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Audio,
    Image,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Audio, Namespace::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Audio => "audio",
            Namespace::Image => "image",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = BlobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Namespace::Audio),
            "image" => Ok(Namespace::Image),
            other => Err(BlobError::invalid(format!("Unknown namespace: {}", other))),
        }
    }
}

/// Store-assigned location of an uploaded blob
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobPath(pub String);

impl BlobPath {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary content plus its declared MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPayload {
    pub bytes: Bytes,
    pub content_type: String,
}

impl BlobPayload {
    pub fn new<B: Into<Bytes>, S: Into<String>>(bytes: B, content_type: S) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type lowercased with any `; param=..` suffix dropped
    pub fn essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

/// Result of a successful blob upload.
///
/// Lives only for the duration of one submission: it is either embedded in a
/// metadata record or handed to compensation for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    pub namespace: Namespace,
    pub key: String,
    pub path: BlobPath,
    pub size_bytes: u64,
}

impl BlobRef {
    pub fn new(namespace: Namespace, key: String, path: BlobPath, size_bytes: u64) -> Self {
        Self {
            namespace,
            key,
            path,
            size_bytes,
        }
    }
}
