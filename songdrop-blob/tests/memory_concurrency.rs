use bytes::Bytes;
use std::collections::HashSet;

use songdrop_blob::prelude::*;

/// M1. Suffixed Keys Never Collide Under Concurrent Uploads
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_with_same_title_all_land() {
    let store = MemoryBlobStore::new();
    let keys = DefaultKeyStrategy;

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let store = store.clone();
            let key = keys.object_key(Namespace::Audio, "Same Title", &keys.unique_suffix());
            tokio::spawn(async move {
                store
                    .upload(Namespace::Audio, &key, Bytes::from_static(b"ID3"), "audio/mpeg")
                    .await
            })
        })
        .collect();

    let mut paths = HashSet::new();
    for handle in handles {
        paths.insert(handle.await.unwrap().unwrap());
    }

    assert_eq!(paths.len(), 64);
    assert_eq!(store.len(), 64);
}

/// M2. Racing Writers On One Key: Exactly One Wins
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_writers_on_one_key() {
    let store = MemoryBlobStore::new();

    let handles: Vec<_> = (0..16u8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .upload(Namespace::Image, "image-cover-fixed", Bytes::from(vec![i]), "image/png")
                    .await
            })
        })
        .collect();

    let mut won = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(err) => assert!(matches!(err, BlobError::Conflict { .. })),
        }
    }

    assert_eq!(won, 1);
    assert_eq!(store.len(), 1);
}
