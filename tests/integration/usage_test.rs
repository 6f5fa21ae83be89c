//! Storage usage readout: sums non-trashed files against the quota.

use bytes::Bytes;

use nubo_client::{DriveBackend, DriveSession};

use crate::helpers::{TEST_QUOTA_BYTES, TestApp};

#[tokio::test]
async fn usage_starts_at_zero() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;

    let usage = backend.usage().await.unwrap();
    assert_eq!(usage.used_bytes, 0);
    assert_eq!(usage.quota_bytes, TEST_QUOTA_BYTES);
    assert_eq!(usage.percent(), 0);
    assert!(!usage.is_warning());
}

#[tokio::test]
async fn usage_sums_active_files_only() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    // A quarter of the quota, split across two folders.
    session
        .upload("root.bin", Bytes::from(vec![0u8; 200_000]))
        .await
        .unwrap();
    let folder = session.create_folder("More").await.unwrap();
    session.enter(folder.id).await.unwrap();
    let nested = session
        .upload("nested.bin", Bytes::from(vec![0u8; 62_144]))
        .await
        .unwrap();

    let usage = session.usage().await.unwrap();
    assert_eq!(usage.used_bytes, 262_144);
    assert_eq!(usage.percent(), 25);

    // Trashing a file removes it from the sum; restoring it puts it back.
    session.trash_file(nested.id).await.unwrap();
    assert_eq!(session.usage().await.unwrap().used_bytes, 200_000);

    session.restore_file(nested.id).await.unwrap();
    assert_eq!(session.usage().await.unwrap().used_bytes, 262_144);
}

#[tokio::test]
async fn usage_warns_past_the_threshold_but_never_blocks_uploads() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    session
        .upload("big.bin", Bytes::from(vec![0u8; 900_000]))
        .await
        .unwrap();

    let usage = session.usage().await.unwrap();
    assert_eq!(usage.percent(), 86);
    assert!(usage.is_warning());

    // The quota is a readout, not a limit: going past 100% still works.
    session
        .upload("overflow.bin", Bytes::from(vec![0u8; 300_000]))
        .await
        .unwrap();

    let usage = session.usage().await.unwrap();
    assert_eq!(usage.used_bytes, 1_200_000);
    assert_eq!(usage.percent(), 100);
}

#[tokio::test]
async fn usage_is_per_user() {
    let app = TestApp::spawn().await;
    let ada = app.registered("ada@example.com").await;
    let bob = app.registered("bob@example.com").await;

    let mut session = DriveSession::connect(ada).await.unwrap();
    session
        .upload("mine.bin", Bytes::from(vec![0u8; 50_000]))
        .await
        .unwrap();

    assert_eq!(session.usage().await.unwrap().used_bytes, 50_000);
    assert_eq!(bob.usage().await.unwrap().used_bytes, 0);
}
