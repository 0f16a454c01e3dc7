use std::collections::BTreeSet;

use songdrop_blob::BlobPayload;

use crate::{Field, OwnerId, UploadRequest, ValidationError};

pub const DEFAULT_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/flac",
    "audio/aac",
    "audio/ogg",
    "audio/mp4",
];

pub const DEFAULT_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Set of accepted MIME essences, compared case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            types
                .into_iter()
                .map(|t| t.as_ref().trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn allows(&self, payload: &BlobPayload) -> bool {
        self.0.contains(&payload.essence())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A request that passed validation, with its required parts unwrapped
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a> {
    pub owner: &'a OwnerId,
    pub title: &'a str,
    pub author: &'a str,
    pub audio: &'a BlobPayload,
    pub image: &'a BlobPayload,
}

/// Pure pre-flight checks; never touches a store
#[derive(Debug, Clone)]
pub struct Validator {
    audio_types: AllowList,
    image_types: AllowList,
    max_blob_bytes: u64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            audio_types: AllowList::new(DEFAULT_AUDIO_TYPES),
            image_types: AllowList::new(DEFAULT_IMAGE_TYPES),
            max_blob_bytes: songdrop_blob::BlobConfig::default().max_blob_bytes,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio_types(mut self, types: AllowList) -> Self {
        self.audio_types = types;
        self
    }

    pub fn with_image_types(mut self, types: AllowList) -> Self {
        self.image_types = types;
        self
    }

    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    /// Checks run in order and stop at the first failure:
    /// title, author, audio, image, owner.
    pub fn validate<'a>(&self, request: &'a UploadRequest) -> Result<Validated<'a>, ValidationError> {
        let title = request.title().trim();
        if title.is_empty() {
            return Err(ValidationError::missing(Field::Title));
        }

        let author = request.author().trim();
        if author.is_empty() {
            return Err(ValidationError::missing(Field::Author));
        }

        let audio = self.check_file(Field::Audio, request.audio(), &self.audio_types)?;
        let image = self.check_file(Field::Image, request.image(), &self.image_types)?;

        let owner = request
            .owner()
            .filter(|o| !o.as_str().trim().is_empty())
            .ok_or(ValidationError::MissingOwner)?;

        Ok(Validated {
            owner,
            title,
            author,
            audio,
            image,
        })
    }

    fn check_file<'a>(
        &self,
        field: Field,
        payload: Option<&'a BlobPayload>,
        allowed: &AllowList,
    ) -> Result<&'a BlobPayload, ValidationError> {
        let payload = payload
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::missing(field))?;

        if !allowed.allows(payload) {
            return Err(ValidationError::UnsupportedType {
                field,
                content_type: payload.content_type.clone(),
            });
        }

        if payload.size_bytes() > self.max_blob_bytes {
            return Err(ValidationError::TooLarge {
                field,
                size: payload.size_bytes(),
                max: self.max_blob_bytes,
            });
        }

        Ok(payload)
    }
}
