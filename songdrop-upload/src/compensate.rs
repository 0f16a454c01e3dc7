use songdrop_blob::{BlobRef, BlobStore};
use tracing::{debug, info, warn};

use crate::CompensationFailure;

/// Best-effort removal of blobs written by an aborted submission.
///
/// One delete per blob, no retries. Failures are logged and swallowed; the
/// caller's outcome is already decided.
pub async fn compensate(store: &dyn BlobStore, blobs: &[BlobRef]) {
    let mut failed = 0usize;
    for blob in blobs {
        if let Err(failure) = delete_one(store, blob).await {
            failed += 1;
            warn!(
                error = %failure,
                transient = failure.source.is_transient(),
                "compensation failure swallowed"
            );
        }
    }

    if failed == 0 {
        info!(deleted = blobs.len(), "compensation complete");
    } else {
        warn!(attempted = blobs.len(), failed, "compensation left orphaned blobs");
    }
}

async fn delete_one(store: &dyn BlobStore, blob: &BlobRef) -> Result<(), CompensationFailure> {
    debug!(namespace = %blob.namespace, path = %blob.path, "compensating delete");
    store
        .delete(blob.namespace, &blob.path)
        .await
        .map_err(|source| CompensationFailure {
            namespace: blob.namespace,
            path: blob.path.clone(),
            source,
        })
}
