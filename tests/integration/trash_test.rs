//! Trash flows: soft delete, undo, restore, and permanent delete.

use bytes::Bytes;

use nubo_client::{DriveBackend, DriveSession};
use nubo_core::error::ErrorKind;

use crate::helpers::TestApp;

#[tokio::test]
async fn trashed_file_leaves_the_listing_and_shows_in_the_trash() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let file = session
        .upload("resume.pdf", Bytes::from_static(b"pdf bytes"))
        .await
        .unwrap();

    session.trash_file(file.id).await.unwrap();
    assert!(session.files().is_empty());

    let trash = session.trash_view().await.unwrap();
    assert_eq!(trash.files.len(), 1);
    assert_eq!(trash.files[0].id, file.id);
    assert!(trash.files[0].is_trashed);
}

#[tokio::test]
async fn undo_within_the_window_brings_the_file_straight_back() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let file = session
        .upload("resume.pdf", Bytes::from_static(b"pdf bytes"))
        .await
        .unwrap();

    session.trash_file(file.id).await.unwrap();
    let pending = session.pending_undo().expect("undo slot should be armed");
    assert_eq!(pending.file_id, file.id);
    assert_eq!(pending.name, "resume.pdf");

    assert!(session.undo_trash().await.unwrap());
    assert_eq!(session.files().len(), 1);
    assert!(!session.files()[0].is_trashed);

    // The slot is spent; a second undo is a no-op.
    assert!(!session.undo_trash().await.unwrap());
    assert!(session.trash_view().await.unwrap().files.is_empty());
}

#[tokio::test]
async fn a_second_delete_replaces_the_undo_target() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let first = session.upload("a.txt", Bytes::from_static(b"a")).await.unwrap();
    let second = session.upload("b.txt", Bytes::from_static(b"b")).await.unwrap();

    session.trash_file(first.id).await.unwrap();
    session.trash_file(second.id).await.unwrap();

    // Undo recovers only the most recently trashed file.
    assert!(session.undo_trash().await.unwrap());
    let names: Vec<_> = session.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["b.txt"]);

    let trash = session.trash_view().await.unwrap();
    assert_eq!(trash.files.len(), 1);
    assert_eq!(trash.files[0].id, first.id);
}

#[tokio::test]
async fn restore_puts_the_file_back_in_its_prior_folder() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let reports = session.create_folder("Reports").await.unwrap();
    session.enter(reports.id).await.unwrap();
    let file = session
        .upload("q1.pdf", Bytes::from_static(b"quarterly"))
        .await
        .unwrap();

    session.trash_file(file.id).await.unwrap();
    assert!(session.files().is_empty());

    let restored = session.restore_file(file.id).await.unwrap();
    assert_eq!(restored.folder_id, Some(reports.id));
    assert!(session.trash_view().await.unwrap().files.is_empty());
    assert_eq!(session.files()[0].id, file.id);
}

#[tokio::test]
async fn trashed_folders_are_restored_from_the_trash_page() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let folder = session.create_folder("Old stuff").await.unwrap();
    session.trash_folder(folder.id).await.unwrap();
    assert!(session.folders().is_empty());

    let trash = session.trash_view().await.unwrap();
    assert_eq!(trash.folders.len(), 1);

    session.restore_folder(folder.id).await.unwrap();
    assert_eq!(session.folders()[0].id, folder.id);
    assert!(session.trash_view().await.unwrap().folders.is_empty());
}

#[tokio::test]
async fn purge_removes_the_blob_and_then_the_row() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let file = session
        .upload("gone.txt", Bytes::from_static(b"bytes"))
        .await
        .unwrap();
    session.trash_file(file.id).await.unwrap();

    session.purge_file(&file).await.unwrap();

    // Row gone.
    assert!(session.trash_view().await.unwrap().files.is_empty());
    let err = session.file(file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Blob gone: signing the key now fails.
    let err = session.open(&file).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn purge_folder_deletes_only_the_row() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;

    let mut session = DriveSession::connect(backend.clone()).await.unwrap();
    let folder = session.create_folder("Doomed").await.unwrap();
    session.enter(folder.id).await.unwrap();
    let orphan = session
        .upload("survivor.txt", Bytes::from_static(b"still here"))
        .await
        .unwrap();

    session.jump_to(None).await.unwrap();
    session.trash_folder(folder.id).await.unwrap();
    session.purge_folder(folder.id).await.unwrap();

    // The contained file keeps its row and its dangling folder link.
    let kept = backend.find_file(orphan.id).await.unwrap().unwrap();
    assert_eq!(kept.folder_id, Some(folder.id));
    assert!(backend.find_folder(folder.id).await.unwrap().is_none());
}
