use serde::{Deserialize, Serialize};
use songdrop_blob::BlobPayload;
use std::fmt;

/// Authenticated owner of a submission, supplied by the caller context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submission attempt: two artifacts plus descriptive metadata.
///
/// Immutable once built. A retry builds a fresh request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    owner: Option<OwnerId>,
    title: String,
    author: String,
    audio: Option<BlobPayload>,
    image: Option<BlobPayload>,
}

impl UploadRequest {
    pub fn builder() -> UploadRequestBuilder {
        UploadRequestBuilder::default()
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn audio(&self) -> Option<&BlobPayload> {
        self.audio.as_ref()
    }

    pub fn image(&self) -> Option<&BlobPayload> {
        self.image.as_ref()
    }
}

/// Collects form input; nothing is checked until validation
#[derive(Debug, Clone, Default)]
pub struct UploadRequestBuilder {
    owner: Option<OwnerId>,
    title: String,
    author: String,
    audio: Option<BlobPayload>,
    image: Option<BlobPayload>,
}

impl UploadRequestBuilder {
    pub fn owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = author.into();
        self
    }

    pub fn audio(mut self, payload: BlobPayload) -> Self {
        self.audio = Some(payload);
        self
    }

    pub fn image(mut self, payload: BlobPayload) -> Self {
        self.image = Some(payload);
        self
    }

    pub fn build(self) -> UploadRequest {
        UploadRequest {
            owner: self.owner,
            title: self.title,
            author: self.author,
            audio: self.audio,
            image: self.image,
        }
    }
}
