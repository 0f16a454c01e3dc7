use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::{primitives::ByteStream as AwsByteStream, Client};
use bytes::Bytes;
use std::env;
use tracing::debug;

use crate::{BlobConfig, BlobError, BlobPath, BlobResult, BlobStore, Namespace};

/// Connection settings for an S3-compatible endpoint
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: String,
    pub audio_bucket: String,
    pub image_bucket: String,
}

impl S3Config {
    pub const DEFAULT_AUDIO_BUCKET: &'static str = "songs";
    pub const DEFAULT_IMAGE_BUCKET: &'static str = "images";

    /// Read `SONGDROP_S3_*` environment variables
    pub fn from_env() -> BlobResult<Self> {
        fn get_env(key: &str) -> BlobResult<String> {
            env::var(key).map_err(|_| BlobError::invalid(format!("{} environment variable required", key)))
        }

        fn get_env_or(key: &str, default: &str) -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        }

        Ok(Self {
            region: get_env("SONGDROP_S3_REGION")?,
            access_key_id: get_env("SONGDROP_S3_ACCESS_KEY_ID")?,
            secret_access_key: get_env("SONGDROP_S3_SECRET_ACCESS_KEY")?,
            endpoint_url: get_env("SONGDROP_S3_ENDPOINT_URL")?,
            audio_bucket: get_env_or("SONGDROP_S3_AUDIO_BUCKET", Self::DEFAULT_AUDIO_BUCKET),
            image_bucket: get_env_or("SONGDROP_S3_IMAGE_BUCKET", Self::DEFAULT_IMAGE_BUCKET),
        })
    }

    pub fn bucket(&self, namespace: Namespace) -> &str {
        match namespace {
            Namespace::Audio => &self.audio_bucket,
            Namespace::Image => &self.image_bucket,
        }
    }
}

/// S3-compatible store with one bucket per namespace
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    s3: S3Config,
    config: BlobConfig,
}

impl S3CompatibleStore {
    pub async fn new(s3: S3Config, config: BlobConfig) -> Self {
        let client = Self::create_client(&s3).await;
        Self { client, s3, config }
    }

    pub async fn from_env(config: BlobConfig) -> BlobResult<Self> {
        Ok(Self::new(S3Config::from_env()?, config).await)
    }

    async fn create_client(s3: &S3Config) -> Client {
        let credentials = Credentials::new(
            s3.access_key_id.clone(),
            s3.secret_access_key.clone(),
            None,
            None,
            "songdrop",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(s3.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(s3.endpoint_url.clone())
            .load()
            .await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build(),
        )
    }

    fn map_sdk_error<E>(err: SdkError<E, HttpResponse>, namespace: Namespace, key: &str, operation: &str) -> BlobError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &err {
            SdkError::TimeoutError(_) => BlobError::timeout(format!("{} {}/{}", operation, namespace, key)),
            // 412: If-None-Match precondition failed, the key already exists.
            // 409: a concurrent conditional write on the same key is in flight.
            SdkError::ServiceError(service) if matches!(service.raw().status().as_u16(), 409 | 412) => {
                BlobError::conflict(namespace, key)
            }
            SdkError::ServiceError(service) if service.raw().status().as_u16() == 404 => {
                BlobError::not_found(namespace, key)
            }
            _ => BlobError::backend(err),
        }
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
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

        let bucket = self.s3.bucket(namespace);
        debug!(bucket, key, size, "put_object");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(AwsByteStream::from(body))
            .content_type(content_type)
            .cache_control(self.config.cache_control_header())
            .if_none_match("*")
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(e, namespace, key, "upload"))?;

        Ok(BlobPath::new(key))
    }

    async fn delete(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<()> {
        let bucket = self.s3.bucket(namespace);
        debug!(bucket, path = %path, "delete_object");

        self.client
            .delete_object()
            .bucket(bucket)
            .key(path.as_str())
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(e, namespace, path.as_str(), "delete"))?;
        Ok(())
    }

    async fn public_url(&self, namespace: Namespace, path: &BlobPath) -> BlobResult<String> {
        Ok(format!(
            "{}/{}/{}",
            self.s3.endpoint_url.trim_end_matches('/'),
            self.s3.bucket(namespace),
            path
        ))
    }
}
