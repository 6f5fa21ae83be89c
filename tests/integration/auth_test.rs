//! Registration, login, logout, and the auth gate on data routes.

use nubo_client::DriveBackend;
use nubo_core::error::ErrorKind;
use nubo_core::types::FolderScope;

use crate::helpers::TestApp;

#[tokio::test]
async fn register_logs_in_and_returns_the_principal() {
    let app = TestApp::spawn().await;

    let mut backend = app.backend();
    let session = backend
        .register("ada@example.com", "correct-horse-battery", Some("Ada"))
        .await
        .unwrap();

    assert_eq!(session.principal.email, "ada@example.com");
    assert_eq!(session.principal.display_name.as_deref(), Some("Ada"));
    assert!(session.expires_at > chrono::Utc::now());

    // The token works for authenticated calls.
    let me = backend.principal().await.unwrap();
    assert_eq!(me.id, session.principal.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = TestApp::spawn().await;
    app.registered("ada@example.com").await;

    let err = app
        .backend()
        .register("ada@example.com", "another-password", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let app = TestApp::spawn().await;

    let err = app
        .backend()
        .register("ada@example.com", "short", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn login_rejects_wrong_credentials() {
    let app = TestApp::spawn().await;
    app.registered("ada@example.com").await;

    let err = app
        .backend()
        .login("ada@example.com", "not-the-password")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    let err = app
        .backend()
        .login("nobody@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn login_works_with_saved_credentials() {
    let app = TestApp::spawn().await;
    let registered = app.registered("ada@example.com").await;

    let mut backend = app.backend();
    let session = backend
        .login("ada@example.com", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(session.principal.email, "ada@example.com");

    // Both sessions see the same account.
    assert_eq!(
        backend.principal().await.unwrap().id,
        registered.principal().await.unwrap().id
    );
}

#[tokio::test]
async fn data_routes_require_a_session() {
    let app = TestApp::spawn().await;

    let backend = app.backend();
    let err = backend.list_folders(FolderScope::Root).await.unwrap_err();
    assert!(err.is_auth_failure());

    let err = backend.usage().await.unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = TestApp::spawn().await;
    let mut backend = app.registered("ada@example.com").await;

    let token = backend.token().unwrap().to_string();
    backend.logout().await.unwrap();

    // Resuming the logged-out token fails even though the JWT itself has
    // not expired: the server-side session row is gone.
    let stale = nubo_client::RemoteBackend::with_token(app.base_url.clone(), token).unwrap();
    let err = stale.principal().await.unwrap_err();
    assert!(err.is_auth_failure());
}
