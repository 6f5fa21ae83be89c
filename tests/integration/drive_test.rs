//! Folder navigation, breadcrumbs, upload, rename, and signed downloads,
//! exercised through `DriveSession` against a live server.

use bytes::Bytes;

use nubo_client::{DriveBackend, DriveSession};
use nubo_core::error::ErrorKind;
use nubo_core::types::FolderScope;

use crate::helpers::TestApp;

#[tokio::test]
async fn listings_are_scoped_to_the_current_folder() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let reports = session.create_folder("Reports").await.unwrap();
    session.create_folder("Archive").await.unwrap();
    session
        .upload("notes.txt", Bytes::from_static(b"root notes"))
        .await
        .unwrap();

    // Folders sort by name; the root listing holds only root rows.
    let names: Vec<_> = session.folders().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Archive", "Reports"]);
    assert_eq!(session.files().len(), 1);
    for folder in session.folders() {
        assert_eq!(folder.parent_id, None);
        assert!(!folder.is_trashed);
    }

    session.enter(reports.id).await.unwrap();
    assert!(session.folders().is_empty());
    assert!(session.files().is_empty());

    session
        .upload("q1.pdf", Bytes::from_static(b"quarterly"))
        .await
        .unwrap();
    assert_eq!(session.files().len(), 1);
    assert_eq!(session.files()[0].folder_id, Some(reports.id));

    session.jump_to(None).await.unwrap();
    let names: Vec<_> = session.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["notes.txt"]);
}

#[tokio::test]
async fn file_listings_are_newest_first() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    session.upload("first.txt", Bytes::from_static(b"1")).await.unwrap();
    session.upload("second.txt", Bytes::from_static(b"2")).await.unwrap();
    session.upload("third.txt", Bytes::from_static(b"3")).await.unwrap();

    let names: Vec<_> = session.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["third.txt", "second.txt", "first.txt"]);
}

#[tokio::test]
async fn breadcrumbs_follow_the_parent_chain_root_first() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();
    assert!(session.breadcrumbs().is_empty());

    let a = session.create_folder("A").await.unwrap();
    session.enter(a.id).await.unwrap();
    let b = session.create_folder("B").await.unwrap();
    session.enter(b.id).await.unwrap();

    let trail: Vec<_> = session
        .breadcrumbs()
        .iter()
        .map(|crumb| crumb.name.as_str())
        .collect();
    assert_eq!(trail, ["A", "B"]);

    // Up goes to the parent, then jumping to a crumb works from anywhere.
    session.up().await.unwrap();
    assert_eq!(session.current_folder(), Some(a.id));

    session.jump_to(Some(b.id)).await.unwrap();
    assert_eq!(session.current_folder(), Some(b.id));

    session.up().await.unwrap();
    session.up().await.unwrap();
    assert_eq!(session.current_folder(), None);
}

#[tokio::test]
async fn upload_registers_size_and_owner_prefixed_key() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let user_id = backend.principal().await.unwrap().id;

    let mut session = DriveSession::connect(backend).await.unwrap();
    let file = session
        .upload("resume.pdf", Bytes::from(vec![0u8; 240_000]))
        .await
        .unwrap();

    assert_eq!(file.name, "resume.pdf");
    assert_eq!(file.size_bytes, 240_000);
    assert!(file.storage_key.starts_with(&format!("{user_id}/")));
    assert!(file.storage_key.ends_with("-resume.pdf"));
    assert!(!file.is_trashed);
}

#[tokio::test]
async fn signed_url_serves_the_blob_without_a_session() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let file = session
        .upload("hello.txt", Bytes::from_static(b"hello, drive"))
        .await
        .unwrap();

    let grant = session.open(&file).await.unwrap();
    assert!(grant.expires_at > chrono::Utc::now());

    // A plain GET, no Authorization header.
    let response = reqwest::get(&grant.url).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"hello, drive");
}

#[tokio::test]
async fn rename_persists_across_a_fresh_listing() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let file = session
        .upload("draft.txt", Bytes::from_static(b"x"))
        .await
        .unwrap();
    let folder = session.create_folder("Stuff").await.unwrap();

    session.rename_file(file.id, "final.txt").await.unwrap();
    session.rename_folder(folder.id, "Things").await.unwrap();

    session.refresh().await.unwrap();
    assert_eq!(session.files()[0].name, "final.txt");
    assert_eq!(session.folders()[0].name, "Things");
}

#[tokio::test]
async fn rename_to_blank_is_rejected_and_nothing_changes() {
    let app = TestApp::spawn().await;
    let backend = app.registered("ada@example.com").await;
    let mut session = DriveSession::connect(backend).await.unwrap();

    let file = session
        .upload("draft.txt", Bytes::from_static(b"x"))
        .await
        .unwrap();

    let err = session.rename_file(file.id, "   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(session.files()[0].name, "draft.txt");
}

#[tokio::test]
async fn users_cannot_see_or_touch_each_others_rows() {
    let app = TestApp::spawn().await;
    let ada = app.registered("ada@example.com").await;
    let bob = app.registered("bob@example.com").await;

    let mut ada_session = DriveSession::connect(ada).await.unwrap();
    ada_session.create_folder("Private").await.unwrap();
    let file = ada_session
        .upload("secret.txt", Bytes::from_static(b"classified"))
        .await
        .unwrap();

    // Bob's listings are empty.
    assert!(bob.list_folders(FolderScope::Root).await.unwrap().is_empty());
    assert!(bob.list_files(FolderScope::Root).await.unwrap().is_empty());

    // Point lookups of Ada's rows come back as missing, not forbidden:
    // the scoping never admits the row existed.
    assert!(bob.find_file(file.id).await.unwrap().is_none());

    // The blob key carries Ada's user id; Bob cannot sign it.
    let err = bob.sign_url(&file.storage_key).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}
