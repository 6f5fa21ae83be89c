//! In-memory [`DriveBackend`] used by tests.
//!
//! Behaves like the real server: every call is gated on a logged-in
//! principal, listings come back in server order, and error messages match
//! what the HTTP backend would surface. Individual calls can be told to
//! fail once via [`MemoryBackend::fail_next`], which is how the session
//! tests exercise partial-failure paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use uuid::Uuid;

use nubo_core::error::AppError;
use nubo_core::result::AppResult;
use nubo_core::types::{FolderScope, StorageUsage};
use nubo_entity::{File, FileUpdate, Folder, FolderUpdate};

use crate::backend::{DriveBackend, NewFileRow, Principal, SignedDownload};

/// Backend calls that can be primed to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp {
    Principal,
    ListFolders,
    ListFiles,
    FindFolder,
    FindFile,
    CreateFolder,
    UpdateFolder,
    DeleteFolderRow,
    ListTrashedFolders,
    ListTrashedFiles,
    InsertFileRow,
    UpdateFile,
    DeleteFileRow,
    PutBlob,
    RemoveBlob,
    SignUrl,
    Usage,
}

#[derive(Debug)]
struct MemoryState {
    principal: Option<Principal>,
    folders: Vec<Folder>,
    files: Vec<File>,
    blobs: HashMap<String, Bytes>,
    /// Primed one-shot failures, consumed in priming order per op.
    failures: Vec<(BackendOp, AppError)>,
    quota_bytes: u64,
    warn_percent: u8,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            principal: None,
            folders: Vec::new(),
            files: Vec::new(),
            blobs: HashMap::new(),
            failures: Vec::new(),
            quota_bytes: 1024 * 1024 * 1024,
            warn_percent: 80,
        }
    }
}

impl MemoryState {
    fn take_failure(&mut self, op: BackendOp) -> Option<AppError> {
        let index = self.failures.iter().position(|(primed, _)| *primed == op)?;
        Some(self.failures.remove(index).1)
    }

    /// Consume any primed failure, then require a logged-in principal.
    /// Failure injection models the call dying before the server sees it.
    fn check(&mut self, op: BackendOp) -> AppResult<Principal> {
        if let Some(err) = self.take_failure(op) {
            return Err(err);
        }
        self.principal
            .clone()
            .ok_or_else(|| AppError::authentication("Not logged in"))
    }
}

/// Rejects storage keys outside the user's own prefix, like the server does.
fn require_owned_key(principal: &Principal, key: &str) -> AppResult<()> {
    match key.split_once('/') {
        Some((first, rest)) if first == principal.id.to_string() && !rest.is_empty() => Ok(()),
        _ => Err(AppError::authorization(
            "Storage key does not belong to the current user",
        )),
    }
}

/// Shared-state fake drive backend.
///
/// Clones share the same state, so a test can keep one handle for seeding
/// and priming while the session under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// An empty backend with nobody logged in.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty backend with a logged-in user.
    pub fn with_principal(email: &str) -> Self {
        let backend = Self::new();
        backend.lock().principal = Some(Principal {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: None,
        });
        backend
    }

    /// The logged-in user's id, if any.
    pub fn principal_id(&self) -> Option<Uuid> {
        self.lock().principal.as_ref().map(|p| p.id)
    }

    /// Drop the principal; subsequent calls fail authentication.
    pub fn clear_principal(&self) {
        self.lock().principal = None;
    }

    /// Prime the next call to `op` to fail with `err`. One failure per
    /// priming; the call after the failed one behaves normally again.
    pub fn fail_next(&self, op: BackendOp, err: AppError) {
        self.lock().failures.push((op, err));
    }

    /// Override the informational quota.
    pub fn set_quota(&self, quota_bytes: u64, warn_percent: u8) {
        let mut state = self.lock();
        state.quota_bytes = quota_bytes;
        state.warn_percent = warn_percent;
    }

    /// Insert a folder row directly, owned by the current principal.
    pub fn seed_folder(&self, name: &str, parent_id: Option<Uuid>) -> Folder {
        let mut state = self.lock();
        let user_id = state.principal.as_ref().map_or(Uuid::nil(), |p| p.id);
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            parent_id,
            is_trashed: false,
            created_at: now,
            updated_at: now,
        };
        state.folders.push(folder.clone());
        folder
    }

    /// Insert a file row and its blob directly, owned by the current
    /// principal, with a well-formed storage key.
    pub fn seed_file(&self, name: &str, folder_id: Option<Uuid>, content: &[u8]) -> File {
        let mut state = self.lock();
        let user_id = state.principal.as_ref().map_or(Uuid::nil(), |p| p.id);
        let key = format!("{user_id}/{}-{name}", Uuid::new_v4());
        state.blobs.insert(key.clone(), Bytes::copy_from_slice(content));
        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            user_id,
            folder_id,
            name: name.to_string(),
            size_bytes: content.len() as i64,
            storage_key: key,
            is_trashed: false,
            created_at: now,
            updated_at: now,
        };
        state.files.push(file.clone());
        file
    }

    /// Point a seeded folder at a different parent. Lets tests build the
    /// malformed chains (cycles, dangling parents) the real tree can get
    /// into through concurrent edits.
    pub fn relink_folder(&self, id: Uuid, parent_id: Option<Uuid>) {
        if let Some(folder) = self.lock().folders.iter_mut().find(|f| f.id == id) {
            folder.parent_id = parent_id;
        }
    }

    /// Blob content under `key`, if present.
    pub fn blob(&self, key: &str) -> Option<Bytes> {
        self.lock().blobs.get(key).cloned()
    }

    /// All stored blob keys, in no particular order.
    pub fn blob_keys(&self) -> Vec<String> {
        self.lock().blobs.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DriveBackend for MemoryBackend {
    async fn principal(&self) -> AppResult<Principal> {
        self.lock().check(BackendOp::Principal)
    }

    async fn list_folders(&self, scope: FolderScope) -> AppResult<Vec<Folder>> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::ListFolders)?;
        let mut folders: Vec<Folder> = state
            .folders
            .iter()
            .filter(|f| {
                f.user_id == principal.id && !f.is_trashed && f.parent_id == scope.parent_id()
            })
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn list_files(&self, scope: FolderScope) -> AppResult<Vec<File>> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::ListFiles)?;
        let mut files: Vec<File> = state
            .files
            .iter()
            .filter(|f| {
                f.user_id == principal.id && !f.is_trashed && f.folder_id == scope.parent_id()
            })
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn find_folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::FindFolder)?;
        Ok(state
            .folders
            .iter()
            .find(|f| f.id == id && f.user_id == principal.id)
            .cloned())
    }

    async fn find_file(&self, id: Uuid) -> AppResult<Option<File>> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::FindFile)?;
        Ok(state
            .files
            .iter()
            .find(|f| f.id == id && f.user_id == principal.id)
            .cloned())
    }

    async fn create_folder(&self, name: &str, parent: FolderScope) -> AppResult<Folder> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::CreateFolder)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if let FolderScope::In(parent_id) = parent {
            let exists = state
                .folders
                .iter()
                .any(|f| f.id == parent_id && f.user_id == principal.id);
            if !exists {
                return Err(AppError::not_found("Parent folder not found"));
            }
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            user_id: principal.id,
            name: name.to_string(),
            parent_id: parent.parent_id(),
            is_trashed: false,
            created_at: now,
            updated_at: now,
        };
        state.folders.push(folder.clone());
        Ok(folder)
    }

    async fn update_folder(&self, id: Uuid, mut update: FolderUpdate) -> AppResult<Folder> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::UpdateFolder)?;

        if let Some(name) = update.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Folder name cannot be empty"));
            }
            update.name = Some(name.to_string());
        }
        if update.is_empty() {
            return Err(AppError::validation("Folder update changes nothing"));
        }

        let folder = state
            .folders
            .iter_mut()
            .find(|f| f.id == id && f.user_id == principal.id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if let Some(name) = update.name {
            folder.name = name;
        }
        if let Some(trashed) = update.is_trashed {
            folder.is_trashed = trashed;
        }
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn delete_folder_row(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::DeleteFolderRow)?;
        let before = state.folders.len();
        state
            .folders
            .retain(|f| !(f.id == id && f.user_id == principal.id));
        if state.folders.len() == before {
            return Err(AppError::not_found("Folder not found"));
        }
        Ok(())
    }

    async fn list_trashed_folders(&self) -> AppResult<Vec<Folder>> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::ListTrashedFolders)?;
        let mut folders: Vec<Folder> = state
            .folders
            .iter()
            .filter(|f| f.user_id == principal.id && f.is_trashed)
            .cloned()
            .collect();
        folders.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(folders)
    }

    async fn list_trashed_files(&self) -> AppResult<Vec<File>> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::ListTrashedFiles)?;
        let mut files: Vec<File> = state
            .files
            .iter()
            .filter(|f| f.user_id == principal.id && f.is_trashed)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn insert_file_row(&self, row: NewFileRow) -> AppResult<File> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::InsertFileRow)?;

        let name = row.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if row.size_bytes < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }
        require_owned_key(&principal, &row.storage_key)?;

        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            user_id: principal.id,
            folder_id: row.folder.parent_id(),
            name: name.to_string(),
            size_bytes: row.size_bytes,
            storage_key: row.storage_key,
            is_trashed: false,
            created_at: now,
            updated_at: now,
        };
        state.files.push(file.clone());
        Ok(file)
    }

    async fn update_file(&self, id: Uuid, mut update: FileUpdate) -> AppResult<File> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::UpdateFile)?;

        if let Some(name) = update.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("File name cannot be empty"));
            }
            update.name = Some(name.to_string());
        }
        if update.is_empty() {
            return Err(AppError::validation("File update changes nothing"));
        }

        let file = state
            .files
            .iter_mut()
            .find(|f| f.id == id && f.user_id == principal.id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        if let Some(name) = update.name {
            file.name = name;
        }
        if let Some(trashed) = update.is_trashed {
            file.is_trashed = trashed;
        }
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn delete_file_row(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::DeleteFileRow)?;
        let before = state.files.len();
        state
            .files
            .retain(|f| !(f.id == id && f.user_id == principal.id));
        if state.files.len() == before {
            return Err(AppError::not_found("File not found"));
        }
        Ok(())
    }

    async fn put_blob(&self, key: &str, data: Bytes) -> AppResult<()> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::PutBlob)?;
        require_owned_key(&principal, key)?;
        state.blobs.insert(key.to_string(), data);
        Ok(())
    }

    async fn remove_blob(&self, key: &str) -> AppResult<()> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::RemoveBlob)?;
        require_owned_key(&principal, key)?;
        // Removing a missing blob is fine, matching the real store.
        state.blobs.remove(key);
        Ok(())
    }

    async fn sign_url(&self, key: &str) -> AppResult<SignedDownload> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::SignUrl)?;
        require_owned_key(&principal, key)?;
        if !state.blobs.contains_key(key) {
            return Err(AppError::not_found(format!("Blob not found: {key}")));
        }
        Ok(SignedDownload {
            url: format!("memory://signed/{key}"),
            expires_at: Utc::now() + Duration::seconds(60),
        })
    }

    async fn usage(&self) -> AppResult<StorageUsage> {
        let mut state = self.lock();
        let principal = state.check(BackendOp::Usage)?;
        let used: i64 = state
            .files
            .iter()
            .filter(|f| f.user_id == principal.id && !f.is_trashed)
            .map(|f| f.size_bytes)
            .sum();
        Ok(StorageUsage::new(
            used.max(0) as u64,
            state.quota_bytes,
            state.warn_percent,
        ))
    }
}
