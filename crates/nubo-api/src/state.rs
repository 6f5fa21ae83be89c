//! Application state shared across all handlers.

use std::sync::Arc;

use nubo_core::config::AppConfig;
use nubo_core::traits::storage::BlobStore;
use nubo_database::DatabasePool;
use nubo_service::auth::AuthService;
use nubo_service::blob::BlobService;
use nubo_service::file::FileService;
use nubo_service::folder::FolderService;
use nubo_service::usage::UsageService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or otherwise cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// SQLite connection pool
    pub db: DatabasePool,
    /// Blob store
    pub blob_store: Arc<dyn BlobStore>,

    // ── Services ─────────────────────────────────────────────
    /// Auth service
    pub auth_service: Arc<AuthService>,
    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// File service
    pub file_service: Arc<FileService>,
    /// Blob service
    pub blob_service: Arc<BlobService>,
    /// Usage service
    pub usage_service: Arc<UsageService>,
}
