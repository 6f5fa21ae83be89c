//! Shared test helpers: spin up a full Nubo server on an ephemeral port.
//!
//! Each test owns its own server, database file, and blob directory, so
//! tests run in parallel without stepping on each other.

use std::sync::Arc;

use tempfile::TempDir;

use nubo_api::AppState;
use nubo_client::RemoteBackend;
use nubo_core::config::{AppConfig, DatabaseConfig};
use nubo_core::traits::storage::BlobStore;
use nubo_database::DatabasePool;
use nubo_database::repositories::file::FileRepository;
use nubo_database::repositories::folder::FolderRepository;
use nubo_database::repositories::session::SessionRepository;
use nubo_database::repositories::user::UserRepository;
use nubo_service::auth::AuthService;
use nubo_service::blob::BlobService;
use nubo_service::file::FileService;
use nubo_service::folder::FolderService;
use nubo_service::usage::UsageService;
use nubo_storage::local::LocalBlobStore;
use nubo_storage::sign::UrlSigner;

/// Quota used by test servers: small enough that a few-KB upload moves
/// the percentage readout.
pub const TEST_QUOTA_BYTES: u64 = 1024 * 1024;

/// A running Nubo server backed by throwaway storage.
pub struct TestApp {
    /// Base URL of the running server, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    /// Temp directory holding the database file and blob root. Dropping
    /// it deletes everything, so it must outlive the test.
    _data_dir: TempDir,
}

impl TestApp {
    /// Start a server on an ephemeral port with a fresh database.
    pub async fn spawn() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = data_dir.path().join("nubo.db");
        let blob_root = data_dir.path().join("blobs");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));

        let mut config = AppConfig {
            server: Default::default(),
            database: DatabaseConfig {
                url: format!("sqlite://{}", db_path.display()),
                ..Default::default()
            },
            auth: Default::default(),
            storage: Default::default(),
            quota: Default::default(),
            logging: Default::default(),
        };
        config.server.public_url = base_url.clone();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.blob_root = blob_root.display().to_string();
        config.quota.max_bytes = TEST_QUOTA_BYTES;

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to open test database");
        nubo_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let blob_store: Arc<dyn BlobStore> = Arc::new(
            LocalBlobStore::new(&config.storage.blob_root)
                .await
                .expect("Failed to create blob store"),
        );
        let signer = Arc::new(UrlSigner::new(
            &config.auth.jwt_secret,
            config.storage.signed_url_ttl_seconds,
        ));

        let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
        let session_repo = Arc::new(SessionRepository::new(db.pool().clone()));
        let folder_repo = Arc::new(FolderRepository::new(db.pool().clone()));
        let file_repo = Arc::new(FileRepository::new(db.pool().clone()));

        let state = AppState {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&user_repo),
                Arc::clone(&session_repo),
                &config.auth,
            )),
            folder_service: Arc::new(FolderService::new(Arc::clone(&folder_repo))),
            file_service: Arc::new(FileService::new(Arc::clone(&file_repo))),
            blob_service: Arc::new(BlobService::new(
                Arc::clone(&blob_store),
                signer,
                config.server.public_url.clone(),
            )),
            usage_service: Arc::new(UsageService::new(
                Arc::clone(&file_repo),
                config.quota.clone(),
            )),
            config: Arc::new(config),
            db,
            blob_store,
        };

        let app = nubo_api::build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server died");
        });

        Self {
            base_url,
            _data_dir: data_dir,
        }
    }

    /// A client for this server, not logged in.
    pub fn backend(&self) -> RemoteBackend {
        RemoteBackend::new(self.base_url.clone()).expect("Failed to build backend")
    }

    /// Register an account and return a logged-in client for it.
    pub async fn registered(&self, email: &str) -> RemoteBackend {
        let mut backend = self.backend();
        backend
            .register(email, "correct-horse-battery", None)
            .await
            .expect("Registration failed");
        backend
    }
}
