use parking_lot::Mutex;
use songdrop_blob::{
    BlobError, BlobKeyStrategy, BlobPayload, BlobRef, BlobStore, DefaultKeyStrategy, Namespace,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn, Instrument, Span};

use crate::{
    compensate, MediaLibrary, MetadataStore, NewRecord, Stage, UploadConfig, UploadError,
    UploadOutcome, UploadRequest, Validated, Validator,
};

/// Drives one submission through validate, audio upload, image upload and
/// metadata insert, deleting already-written blobs when a later step fails.
///
/// Holds no per-submission state, so one instance serves any number of
/// concurrent `submit` calls. Keys carry a fresh suffix per call, which is
/// what keeps concurrent or repeated submissions apart.
#[derive(Clone)]
pub struct UploadOrchestrator {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
    keys: Arc<dyn BlobKeyStrategy>,
    validator: Validator,
}

impl UploadOrchestrator {
    pub fn new<B, M>(blobs: B, metadata: M) -> Self
    where
        B: BlobStore + 'static,
        M: MetadataStore + 'static,
    {
        Self::from_shared(Arc::new(blobs), Arc::new(metadata))
    }

    pub fn from_shared(blobs: Arc<dyn BlobStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            blobs,
            metadata,
            keys: Arc::new(DefaultKeyStrategy),
            validator: Validator::default(),
        }
    }

    /// Build with the validator described by `config`
    pub fn from_config<B, M>(blobs: B, metadata: M, config: &UploadConfig) -> Self
    where
        B: BlobStore + 'static,
        M: MetadataStore + 'static,
    {
        Self::new(blobs, metadata).with_validator(config.validator())
    }

    pub fn with_key_strategy<K: BlobKeyStrategy + 'static>(mut self, keys: K) -> Self {
        self.keys = Arc::new(keys);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Read side over the same stores
    pub fn library(&self) -> MediaLibrary {
        MediaLibrary::new(Arc::clone(&self.blobs), Arc::clone(&self.metadata))
    }

    /// Run one submission attempt to completion and report its outcome.
    ///
    /// The sequence runs on its own task: dropping the returned future does
    /// not stop it halfway, so compensation always gets its chance. Must be
    /// called from within a tokio runtime.
    #[instrument(
        name = "upload.submit",
        skip_all,
        fields(
            title = %request.title(),
            owner = tracing::field::Empty,
            submission = tracing::field::Empty,
        )
    )]
    pub async fn submit(&self, request: UploadRequest) -> UploadOutcome {
        let this = self.clone();
        let reached = Arc::new(Mutex::new(Stage::Validation));
        let task = tokio::spawn({
            let reached = Arc::clone(&reached);
            async move { this.run(request, &reached).await }.in_current_span()
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                let stage = *reached.lock();
                error!(%stage, error = %err, "submission task cancelled");
                UploadOutcome::failure(
                    stage,
                    UploadError::Interrupted {
                        message: err.to_string(),
                    },
                )
            }
        }
    }

    async fn run(&self, request: UploadRequest, reached: &Mutex<Stage>) -> UploadOutcome {
        let valid = match self.validator.validate(&request) {
            Ok(valid) => valid,
            Err(err) => {
                if err.is_precondition() {
                    error!(error = %err, "submit called without an owner");
                } else {
                    info!(field = %err.field(), error = %err, "submission rejected");
                }
                return UploadOutcome::failure(Stage::Validation, err);
            }
        };

        let suffix = self.keys.unique_suffix();
        let span = Span::current();
        span.record("owner", valid.owner.as_str());
        span.record("submission", suffix.as_str());

        *reached.lock() = Stage::AudioUpload;
        let audio = match self.put_blob(Namespace::Audio, &valid, &suffix, valid.audio).await {
            Ok(blob) => blob,
            Err(err) => {
                warn!(error = %err, "audio upload failed");
                return UploadOutcome::failure(Stage::AudioUpload, err);
            }
        };

        *reached.lock() = Stage::ImageUpload;
        let image = match self.put_blob(Namespace::Image, &valid, &suffix, valid.image).await {
            Ok(blob) => blob,
            Err(err) => {
                warn!(error = %err, "image upload failed, removing audio blob");
                compensate(self.blobs.as_ref(), std::slice::from_ref(&audio)).await;
                return UploadOutcome::failure(Stage::ImageUpload, err);
            }
        };

        *reached.lock() = Stage::MetadataInsert;
        let record = NewRecord {
            owner: valid.owner.clone(),
            title: valid.title.to_string(),
            author: valid.author.to_string(),
            audio_path: audio.path.clone(),
            image_path: image.path.clone(),
        };

        debug!("inserting metadata record");
        match self.metadata.insert(record).await {
            Ok(record) => {
                info!(record = %record.id, "submission committed");
                UploadOutcome::Success { record }
            }
            Err(err) => {
                warn!(error = %err, "metadata insert failed, removing both blobs");
                compensate(self.blobs.as_ref(), &[audio, image]).await;
                UploadOutcome::failure(Stage::MetadataInsert, err)
            }
        }
    }

    async fn put_blob(
        &self,
        namespace: Namespace,
        valid: &Validated<'_>,
        suffix: &str,
        payload: &BlobPayload,
    ) -> Result<BlobRef, BlobError> {
        let key = self.keys.object_key(namespace, valid.title, suffix);
        debug!(%namespace, %key, size = payload.size_bytes(), "uploading blob");

        let path = self
            .blobs
            .upload(namespace, &key, payload.bytes.clone(), &payload.content_type)
            .await?;

        info!(%namespace, %path, "blob stored");
        Ok(BlobRef::new(namespace, key, path, payload.size_bytes()))
    }
}
