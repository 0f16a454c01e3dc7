use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use songdrop_blob::{BlobPayload, BlobStore, MemoryBlobStore, S3CompatibleStore};
use songdrop_upload::telemetry::init_tracing;
use songdrop_upload::{
    MemoryMetadataStore, OwnerId, UploadConfig, UploadOrchestrator, UploadRequest,
    DEFAULT_ENV_PREFIX,
};

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

async fn read_payload(path: &str) -> Result<BlobPayload> {
    let path = Path::new(path);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(BlobPayload::new(bytes, content_type_for(path)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = UploadConfig::from_env(DEFAULT_ENV_PREFIX);
    init_tracing(config.log_format());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [title, author, audio, image] = args.as_slice() else {
        bail!("usage: local-upload <title> <author> <audio-file> <image-file>");
    };

    let blobs: Arc<dyn BlobStore> = if std::env::var("SONGDROP_S3_ENDPOINT_URL").is_ok() {
        Arc::new(S3CompatibleStore::from_env(config.blob_config()).await?)
    } else {
        tracing::info!("SONGDROP_S3_ENDPOINT_URL not set, using in-memory blob store");
        Arc::new(MemoryBlobStore::with_config(config.blob_config()))
    };

    let orchestrator = UploadOrchestrator::from_shared(blobs, Arc::new(MemoryMetadataStore::new()))
        .with_validator(config.validator());

    // stands in for the session layer
    let mut request = UploadRequest::builder()
        .title(title.as_str())
        .author(author.as_str())
        .audio(read_payload(audio).await?)
        .image(read_payload(image).await?);
    if let Ok(owner) = std::env::var("SONGDROP_OWNER") {
        request = request.owner(OwnerId::new(owner));
    }

    let outcome = orchestrator.submit(request.build()).await;
    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);

    if let Some(record) = outcome.record() {
        for entry in orchestrator.library().list(&record.owner).await? {
            println!(
                "{} by {} -> {}",
                entry.record.title,
                entry.record.author,
                entry.cover_url.as_deref().unwrap_or("(no cover)")
            );
        }
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
