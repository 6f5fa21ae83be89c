//! The backend boundary every drive client runs against.
//!
//! [`DriveBackend`] is the full set of calls the drive UI needs: identity,
//! folder and file metadata, blob bytes, signed URLs, and usage. The session
//! layer is written against this trait only, so the same flows run over HTTP
//! ([`crate::RemoteBackend`]) and against the in-memory fake
//! ([`crate::MemoryBackend`]) used in tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nubo_core::result::AppResult;
use nubo_core::types::{FolderScope, StorageUsage};
use nubo_entity::{File, FileUpdate, Folder, FolderUpdate};

/// The identity of the logged-in user as the client sees it.
///
/// This is the public slice of the server-side user record. The server never
/// sends credential fields, so the client keeps its own shape instead of
/// reusing the full entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique user identifier. Blob keys are prefixed with this.
    pub id: Uuid,
    /// Email address used to log in.
    pub email: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

impl Principal {
    /// The name to show in the UI: display name when set, email otherwise.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Metadata for a file row whose blob has already been written.
///
/// Upload is two calls: blob bytes first, then this row. The shape matches
/// what the registration endpoint accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRow {
    /// Display name of the file.
    pub name: String,
    /// The folder the file lives in.
    pub folder: FolderScope,
    /// Blob size in bytes.
    pub size_bytes: i64,
    /// Key the blob was written under.
    pub storage_key: String,
}

/// A short-lived signed URL for one blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedDownload {
    /// The URL to fetch. Carries its own grant; no session is needed.
    pub url: String,
    /// When the grant stops working.
    pub expires_at: DateTime<Utc>,
}

/// Everything a drive session needs from a backend.
///
/// Implementations are expected to enforce ownership server-side (or fake
/// it, for test doubles): every call is scoped to the authenticated user,
/// and errors come back as [`nubo_core::error::AppError`] with the
/// backend's message intact.
#[async_trait]
pub trait DriveBackend: Send + Sync {
    /// The authenticated user, or an authentication error when not logged in.
    async fn principal(&self) -> AppResult<Principal>;

    /// Non-trashed folders directly under `scope`, sorted by name.
    async fn list_folders(&self, scope: FolderScope) -> AppResult<Vec<Folder>>;

    /// Non-trashed files directly in `scope`, newest first.
    async fn list_files(&self, scope: FolderScope) -> AppResult<Vec<File>>;

    /// Look up one folder by id. `Ok(None)` when it does not exist, so
    /// callers walking parent chains can treat a dangling link as a stop
    /// rather than a failure.
    async fn find_folder(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Look up one file by id, trashed or not.
    async fn find_file(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Create a folder under `parent`.
    async fn create_folder(&self, name: &str, parent: FolderScope) -> AppResult<Folder>;

    /// Apply a partial update (rename, trash flag) to a folder.
    async fn update_folder(&self, id: Uuid, update: FolderUpdate) -> AppResult<Folder>;

    /// Delete a folder row outright. Contents are not touched.
    async fn delete_folder_row(&self, id: Uuid) -> AppResult<()>;

    /// All trashed folders, most recently trashed first.
    async fn list_trashed_folders(&self) -> AppResult<Vec<Folder>>;

    /// All trashed files, newest first.
    async fn list_trashed_files(&self) -> AppResult<Vec<File>>;

    /// Register a file row for an already-written blob.
    async fn insert_file_row(&self, row: NewFileRow) -> AppResult<File>;

    /// Apply a partial update (rename, trash flag) to a file.
    async fn update_file(&self, id: Uuid, update: FileUpdate) -> AppResult<File>;

    /// Delete a file row outright. The blob is not touched.
    async fn delete_file_row(&self, id: Uuid) -> AppResult<()>;

    /// Write blob bytes under `key`, replacing any previous content.
    async fn put_blob(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Remove the blob under `key`. Removing a missing blob succeeds.
    async fn remove_blob(&self, key: &str) -> AppResult<()>;

    /// Get a short-lived signed URL for the blob under `key`.
    async fn sign_url(&self, key: &str) -> AppResult<SignedDownload>;

    /// Current storage usage against the quota.
    async fn usage(&self) -> AppResult<StorageUsage>;
}
