//! Drive session: navigation, listings, and the mutation flows.
//!
//! [`DriveSession`] owns everything a drive UI shows for one logged-in
//! user: the current folder, its listings, the breadcrumb trail, the
//! pending undo slot, and the search filter. All I/O goes through the
//! [`DriveBackend`] it was connected with.
//!
//! Listing failures degrade to an empty view with a warning in the log;
//! only authentication failures surface, because those mean the whole
//! session is dead. Mutations always surface their errors verbatim.

use std::collections::HashSet;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::warn;
use uuid::Uuid;

use nubo_core::error::AppError;
use nubo_core::result::AppResult;
use nubo_core::types::{FolderScope, StorageUsage};
use nubo_entity::{File, FileUpdate, Folder, FolderUpdate};

use crate::backend::{DriveBackend, NewFileRow, Principal, SignedDownload};

/// How long a just-trashed file can be brought straight back.
pub const UNDO_WINDOW: Duration = Duration::from_secs(5);

/// One segment of the breadcrumb trail, root-most first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    /// The folder this crumb navigates to.
    pub id: Uuid,
    /// The folder name shown in the trail.
    pub name: String,
}

/// The single undo slot. Trashing another file replaces it.
#[derive(Debug, Clone)]
pub struct PendingUndo {
    /// The file that was just trashed.
    pub file_id: Uuid,
    /// Its name, for the undo prompt.
    pub name: String,
    /// When the undo window closes.
    deadline: Instant,
}

impl PendingUndo {
    /// Time left in the undo window.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Trashed folders and files, ready for the trash page.
#[derive(Debug, Clone, Default)]
pub struct TrashView {
    /// Trashed folders, most recently trashed first.
    pub folders: Vec<Folder>,
    /// Trashed files, newest first.
    pub files: Vec<File>,
}

/// One user's live view of their drive.
#[derive(Debug)]
pub struct DriveSession<B: DriveBackend> {
    backend: B,
    principal: Principal,
    /// The folder being viewed, `None` at the root.
    current_folder: Option<Uuid>,
    folders: Vec<Folder>,
    files: Vec<File>,
    /// Trail from the root down to the current folder.
    breadcrumbs: Vec<Crumb>,
    pending_undo: Option<PendingUndo>,
    /// Case-insensitive substring filter over the current listings.
    filter: Option<String>,
}

impl<B: DriveBackend> DriveSession<B> {
    /// Connect and load the root listing.
    ///
    /// Fails with an authentication error when the backend has no
    /// logged-in user, so callers can route straight to the login flow.
    pub async fn connect(backend: B) -> AppResult<Self> {
        let principal = backend.principal().await?;
        let mut session = Self {
            backend,
            principal,
            current_folder: None,
            folders: Vec::new(),
            files: Vec::new(),
            breadcrumbs: Vec::new(),
            pending_undo: None,
            filter: None,
        };
        session.refresh().await?;
        Ok(session)
    }

    fn scope(&self) -> FolderScope {
        FolderScope::from_parent(self.current_folder)
    }

    /// Reload the listings and breadcrumbs for the current folder.
    ///
    /// A failed listing becomes an empty one; the user sees an empty
    /// folder rather than a broken page, and the cause lands in the log.
    /// Authentication failures are not swallowed.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let scope = self.scope();

        self.folders = match self.backend.list_folders(scope).await {
            Ok(folders) => folders,
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(err) => {
                warn!(error = %err, "Folder listing failed; showing empty");
                Vec::new()
            }
        };

        self.files = match self.backend.list_files(scope).await {
            Ok(files) => files,
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(err) => {
                warn!(error = %err, "File listing failed; showing empty");
                Vec::new()
            }
        };

        self.breadcrumbs = self.build_breadcrumbs().await?;
        Ok(())
    }

    /// Walk parent links from the current folder up to the root.
    ///
    /// The tree can be malformed (dangling parents, cycles introduced by
    /// concurrent edits), so the walk keeps a visited set and truncates
    /// the trail instead of looping or failing.
    async fn build_breadcrumbs(&self) -> AppResult<Vec<Crumb>> {
        let mut crumbs = Vec::new();
        let mut cursor = self.current_folder;
        let mut visited = HashSet::new();

        while let Some(id) = cursor {
            if !visited.insert(id) {
                warn!(folder_id = %id, "Folder parent chain loops; truncating breadcrumbs");
                break;
            }
            match self.backend.find_folder(id).await {
                Ok(Some(folder)) => {
                    cursor = folder.parent_id;
                    crumbs.insert(
                        0,
                        Crumb {
                            id: folder.id,
                            name: folder.name,
                        },
                    );
                }
                Ok(None) => break,
                Err(err) if err.is_auth_failure() => return Err(err),
                Err(err) => {
                    warn!(error = %err, "Breadcrumb lookup failed; truncating");
                    break;
                }
            }
        }
        Ok(crumbs)
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Open a folder.
    pub async fn enter(&mut self, folder_id: Uuid) -> AppResult<()> {
        self.current_folder = Some(folder_id);
        self.refresh().await
    }

    /// Jump to a breadcrumb, or to the root with `None`.
    pub async fn jump_to(&mut self, folder_id: Option<Uuid>) -> AppResult<()> {
        self.current_folder = folder_id;
        self.refresh().await
    }

    /// Go up one level. At the root this is a refresh.
    pub async fn up(&mut self) -> AppResult<()> {
        let parent = self.breadcrumbs.iter().rev().nth(1).map(|crumb| crumb.id);
        self.jump_to(parent).await
    }

    // ─── Folders ─────────────────────────────────────────────────────────

    /// Create a folder in the current one.
    pub async fn create_folder(&mut self, name: &str) -> AppResult<Folder> {
        let folder = self.backend.create_folder(name, self.scope()).await?;
        self.refresh().await?;
        Ok(folder)
    }

    /// Rename a folder.
    pub async fn rename_folder(&mut self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        let folder = self
            .backend
            .update_folder(folder_id, FolderUpdate::rename(new_name))
            .await?;
        // Folders sort by name, so a rename can reorder the listing.
        self.refresh().await?;
        Ok(folder)
    }

    /// Move a folder to the trash. Files only get the undo prompt; a
    /// trashed folder is recovered from the trash page.
    pub async fn trash_folder(&mut self, folder_id: Uuid) -> AppResult<()> {
        self.backend
            .update_folder(folder_id, FolderUpdate::set_trashed(true))
            .await?;
        self.refresh().await
    }

    /// Bring a folder back from the trash.
    pub async fn restore_folder(&mut self, folder_id: Uuid) -> AppResult<Folder> {
        let folder = self
            .backend
            .update_folder(folder_id, FolderUpdate::set_trashed(false))
            .await?;
        self.refresh().await?;
        Ok(folder)
    }

    /// Permanently delete a trashed folder's row. Its contents keep their
    /// dangling reference and stay reachable through the trash page.
    pub async fn purge_folder(&mut self, folder_id: Uuid) -> AppResult<()> {
        self.backend.delete_folder_row(folder_id).await
    }

    // ─── Files ───────────────────────────────────────────────────────────

    /// Upload a file into the current folder: blob bytes first, then the
    /// row. When the row insert fails the blob is left where it is and the
    /// error surfaces; nothing tries to clean up.
    pub async fn upload(&mut self, name: &str, data: Bytes) -> AppResult<File> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if name.contains('/') {
            return Err(AppError::validation("File name cannot contain '/'"));
        }

        let key = format!("{}/{}-{name}", self.principal.id, Uuid::new_v4());
        let size_bytes = data.len() as i64;
        self.backend.put_blob(&key, data).await?;

        let row = NewFileRow {
            name: name.to_string(),
            folder: self.scope(),
            size_bytes,
            storage_key: key.clone(),
        };
        let file = match self.backend.insert_file_row(row).await {
            Ok(file) => file,
            Err(err) => {
                warn!(key = %key, error = %err, "File row insert failed after blob write; blob left in place");
                return Err(err);
            }
        };

        self.refresh().await?;
        Ok(file)
    }

    /// Rename a file in the current listing, optimistically.
    ///
    /// The listing shows the new name immediately. If the backend rejects
    /// the rename, the old name is put back exactly as it was and the
    /// backend's error is returned untouched.
    pub async fn rename_file(&mut self, file_id: Uuid, new_name: &str) -> AppResult<File> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        let Some(index) = self.files.iter().position(|f| f.id == file_id) else {
            return Err(AppError::not_found("File not found"));
        };

        let previous = std::mem::replace(&mut self.files[index].name, new_name.to_string());
        match self
            .backend
            .update_file(file_id, FileUpdate::rename(new_name))
            .await
        {
            Ok(file) => {
                self.files[index] = file.clone();
                Ok(file)
            }
            Err(err) => {
                self.files[index].name = previous;
                Err(err)
            }
        }
    }

    /// Move a file to the trash and open the undo window.
    ///
    /// There is one undo slot; trashing a second file while the first
    /// window is still open forgets the first.
    pub async fn trash_file(&mut self, file_id: Uuid) -> AppResult<()> {
        let file = self
            .backend
            .update_file(file_id, FileUpdate::set_trashed(true))
            .await?;
        self.pending_undo = Some(PendingUndo {
            file_id,
            name: file.name,
            deadline: Instant::now() + UNDO_WINDOW,
        });
        self.refresh().await
    }

    /// The undo prompt to show, if its window is still open.
    pub fn pending_undo(&mut self) -> Option<&PendingUndo> {
        let expired = self
            .pending_undo
            .as_ref()
            .is_some_and(|pending| pending.deadline <= Instant::now());
        if expired {
            self.pending_undo = None;
        }
        self.pending_undo.as_ref()
    }

    /// Restore the file in the undo slot.
    ///
    /// Returns `Ok(false)` when there is nothing to undo or the window
    /// has closed; the file then stays in the trash.
    pub async fn undo_trash(&mut self) -> AppResult<bool> {
        let Some(pending) = self.pending_undo.take() else {
            return Ok(false);
        };
        if pending.deadline <= Instant::now() {
            return Ok(false);
        }
        self.backend
            .update_file(pending.file_id, FileUpdate::set_trashed(false))
            .await?;
        self.refresh().await?;
        Ok(true)
    }

    /// Bring a file back from the trash into the folder it was in.
    pub async fn restore_file(&mut self, file_id: Uuid) -> AppResult<File> {
        let file = self
            .backend
            .update_file(file_id, FileUpdate::set_trashed(false))
            .await?;
        // The undo prompt is moot once the file is back.
        if self
            .pending_undo
            .as_ref()
            .is_some_and(|pending| pending.file_id == file_id)
        {
            self.pending_undo = None;
        }
        self.refresh().await?;
        Ok(file)
    }

    /// Permanently delete a trashed file: blob first, then the row.
    ///
    /// When the blob removal fails the row is left untouched and the
    /// error surfaces, so the file never silently loses its bytes' last
    /// reference.
    pub async fn purge_file(&mut self, file: &File) -> AppResult<()> {
        self.backend.remove_blob(&file.storage_key).await?;
        self.backend.delete_file_row(file.id).await?;
        if self
            .pending_undo
            .as_ref()
            .is_some_and(|pending| pending.file_id == file.id)
        {
            self.pending_undo = None;
        }
        Ok(())
    }

    /// Look up one file by id, trashed or not.
    pub async fn file(&self, file_id: Uuid) -> AppResult<File> {
        self.backend
            .find_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// A short-lived link for opening or downloading the file.
    pub async fn open(&self, file: &File) -> AppResult<SignedDownload> {
        self.backend.sign_url(&file.storage_key).await
    }

    // ─── Trash and usage ─────────────────────────────────────────────────

    /// Everything in the trash. Failed listings degrade to empty here the
    /// same way [`refresh`](Self::refresh) does.
    pub async fn trash_view(&self) -> AppResult<TrashView> {
        let folders = match self.backend.list_trashed_folders().await {
            Ok(folders) => folders,
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(err) => {
                warn!(error = %err, "Trashed folder listing failed; showing empty");
                Vec::new()
            }
        };
        let files = match self.backend.list_trashed_files().await {
            Ok(files) => files,
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(err) => {
                warn!(error = %err, "Trashed file listing failed; showing empty");
                Vec::new()
            }
        };
        Ok(TrashView { folders, files })
    }

    /// Current storage usage against the quota.
    pub async fn usage(&self) -> AppResult<StorageUsage> {
        self.backend.usage().await
    }

    // ─── Search ──────────────────────────────────────────────────────────

    /// Filter the visible listings by a case-insensitive substring.
    /// A blank query clears the filter.
    pub fn set_filter(&mut self, query: &str) {
        let query = query.trim();
        self.filter = if query.is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
    }

    /// Drop the search filter.
    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// The folders to show, after the search filter.
    pub fn visible_folders(&self) -> Vec<&Folder> {
        match &self.filter {
            Some(needle) => self
                .folders
                .iter()
                .filter(|f| f.name.to_lowercase().contains(needle))
                .collect(),
            None => self.folders.iter().collect(),
        }
    }

    /// The files to show, after the search filter.
    pub fn visible_files(&self) -> Vec<&File> {
        match &self.filter {
            Some(needle) => self
                .files
                .iter()
                .filter(|f| f.name.to_lowercase().contains(needle))
                .collect(),
            None => self.files.iter().collect(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Who is logged in.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// The folder being viewed, `None` at the root.
    pub fn current_folder(&self) -> Option<Uuid> {
        self.current_folder
    }

    /// The breadcrumb trail, root-most first. Empty at the root.
    pub fn breadcrumbs(&self) -> &[Crumb] {
        &self.breadcrumbs
    }

    /// The current folder listing, unfiltered.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// The current file listing, unfiltered.
    pub fn files(&self) -> &[File] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{BackendOp, MemoryBackend};
    use nubo_core::error::ErrorKind;

    async fn seeded_session() -> (MemoryBackend, DriveSession<MemoryBackend>) {
        let backend = MemoryBackend::with_principal("ada@example.com");
        let session = DriveSession::connect(backend.clone()).await.unwrap();
        (backend, session)
    }

    fn folder_names(session: &DriveSession<MemoryBackend>) -> Vec<String> {
        session.folders().iter().map(|f| f.name.clone()).collect()
    }

    fn file_names(session: &DriveSession<MemoryBackend>) -> Vec<String> {
        session.files().iter().map(|f| f.name.clone()).collect()
    }

    #[tokio::test]
    async fn connect_requires_a_logged_in_user() {
        let err = DriveSession::connect(MemoryBackend::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Not logged in");
    }

    #[tokio::test]
    async fn listings_are_scoped_to_the_current_folder() {
        let backend = MemoryBackend::with_principal("ada@example.com");
        let reports = backend.seed_folder("Reports", None);
        backend.seed_file("root.txt", None, b"r");
        backend.seed_file("q1.pdf", Some(reports.id), b"q1");

        let mut session = DriveSession::connect(backend).await.unwrap();
        assert_eq!(folder_names(&session), ["Reports"]);
        assert_eq!(file_names(&session), ["root.txt"]);

        session.enter(reports.id).await.unwrap();
        assert!(session.folders().is_empty());
        assert_eq!(file_names(&session), ["q1.pdf"]);

        session.up().await.unwrap();
        assert_eq!(session.current_folder(), None);
        assert_eq!(file_names(&session), ["root.txt"]);
    }

    #[tokio::test]
    async fn breadcrumbs_follow_the_parent_chain() {
        let backend = MemoryBackend::with_principal("ada@example.com");
        let a = backend.seed_folder("A", None);
        let b = backend.seed_folder("B", Some(a.id));

        let mut session = DriveSession::connect(backend).await.unwrap();
        assert!(session.breadcrumbs().is_empty());

        session.enter(b.id).await.unwrap();
        let names: Vec<&str> = session.breadcrumbs().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);

        session.jump_to(Some(a.id)).await.unwrap();
        let names: Vec<&str> = session.breadcrumbs().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A"]);
    }

    #[tokio::test]
    async fn breadcrumb_walk_stops_on_cycles() {
        let backend = MemoryBackend::with_principal("ada@example.com");
        let a = backend.seed_folder("A", None);
        let b = backend.seed_folder("B", Some(a.id));
        backend.relink_folder(a.id, Some(b.id));

        let mut session = DriveSession::connect(backend).await.unwrap();
        session.enter(b.id).await.unwrap();

        let names: Vec<&str> = session.breadcrumbs().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[tokio::test]
    async fn breadcrumb_walk_stops_at_dangling_parents() {
        let backend = MemoryBackend::with_principal("ada@example.com");
        let orphan = backend.seed_folder("Orphan", Some(Uuid::new_v4()));

        let mut session = DriveSession::connect(backend).await.unwrap();
        session.enter(orphan.id).await.unwrap();

        let names: Vec<&str> = session.breadcrumbs().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Orphan"]);
    }

    #[tokio::test]
    async fn listing_failures_show_an_empty_folder() {
        let (backend, mut session) = seeded_session().await;
        backend.seed_folder("Docs", None);

        backend.fail_next(BackendOp::ListFolders, AppError::database("db down"));
        session.refresh().await.unwrap();
        assert!(session.folders().is_empty());

        // Next refresh sees the folder again.
        session.refresh().await.unwrap();
        assert_eq!(folder_names(&session), ["Docs"]);
    }

    #[tokio::test]
    async fn auth_failures_are_not_swallowed() {
        let (backend, mut session) = seeded_session().await;
        backend.fail_next(
            BackendOp::ListFiles,
            AppError::authentication("Session has expired"),
        );
        let err = session.refresh().await.unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.message, "Session has expired");
    }

    #[tokio::test]
    async fn upload_writes_blob_then_row() {
        let (backend, mut session) = seeded_session().await;
        let user_id = backend.principal_id().unwrap();

        let file = session
            .upload("notes.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        assert_eq!(file.size_bytes, 5);
        assert!(file.storage_key.starts_with(&format!("{user_id}/")));
        assert_eq!(backend.blob(&file.storage_key).unwrap().as_ref(), b"hello");
        assert_eq!(file_names(&session), ["notes.txt"]);

        // Uploads land in the folder being viewed.
        let docs = session.create_folder("Docs").await.unwrap();
        session.enter(docs.id).await.unwrap();
        let nested = session
            .upload("inner.txt", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert_eq!(nested.folder_id, Some(docs.id));
    }

    #[tokio::test]
    async fn upload_rejects_unusable_names() {
        let (_backend, mut session) = seeded_session().await;
        let err = session.upload("   ", Bytes::from_static(b"x")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = session
            .upload("a/b.txt", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn failed_row_insert_leaves_the_blob_behind() {
        let (backend, mut session) = seeded_session().await;
        backend.fail_next(BackendOp::InsertFileRow, AppError::database("insert failed"));

        let err = session
            .upload("doomed.txt", Bytes::from_static(b"bytes"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "insert failed");

        // The blob was written and nothing cleaned it up.
        let keys = backend.blob_keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].ends_with("-doomed.txt"));
        assert!(session.files().is_empty());
    }

    #[tokio::test]
    async fn rename_applies_optimistically() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("draft.txt", None, b"d");
        session.refresh().await.unwrap();

        let renamed = session.rename_file(file.id, "final.txt").await.unwrap();
        assert_eq!(renamed.name, "final.txt");
        assert_eq!(file_names(&session), ["final.txt"]);
    }

    #[tokio::test]
    async fn rename_rolls_back_on_failure() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("draft.txt", None, b"d");
        session.refresh().await.unwrap();

        backend.fail_next(
            BackendOp::UpdateFile,
            AppError::validation("Name already taken"),
        );
        let err = session.rename_file(file.id, "final.txt").await.unwrap_err();

        // The backend's message comes through untouched and the listing
        // shows the exact old name again.
        assert_eq!(err.message, "Name already taken");
        assert_eq!(file_names(&session), ["draft.txt"]);
    }

    #[tokio::test(start_paused = true)]
    async fn trash_then_undo_restores_within_the_window() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("report.pdf", None, b"r");
        session.refresh().await.unwrap();

        session.trash_file(file.id).await.unwrap();
        assert!(session.files().is_empty());
        assert_eq!(session.pending_undo().unwrap().name, "report.pdf");

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(session.undo_trash().await.unwrap());
        assert_eq!(file_names(&session), ["report.pdf"]);
        assert!(session.pending_undo().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn undo_after_the_window_is_a_no_op() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("report.pdf", None, b"r");
        session.refresh().await.unwrap();
        session.trash_file(file.id).await.unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(!session.undo_trash().await.unwrap());
        assert!(session.pending_undo().is_none());

        let trash = session.trash_view().await.unwrap();
        assert_eq!(trash.files.len(), 1);
        assert_eq!(trash.files[0].name, "report.pdf");
    }

    #[tokio::test(start_paused = true)]
    async fn undo_prompt_disappears_after_the_window() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("report.pdf", None, b"r");
        session.refresh().await.unwrap();
        session.trash_file(file.id).await.unwrap();

        assert!(session.pending_undo().is_some());
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(session.pending_undo().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn second_trash_replaces_the_undo_slot() {
        let (backend, mut session) = seeded_session().await;
        let first = backend.seed_file("first.txt", None, b"1");
        let second = backend.seed_file("second.txt", None, b"2");
        session.refresh().await.unwrap();

        session.trash_file(first.id).await.unwrap();
        session.trash_file(second.id).await.unwrap();
        assert_eq!(session.pending_undo().unwrap().name, "second.txt");

        // Undo brings back only the second file.
        assert!(session.undo_trash().await.unwrap());
        assert_eq!(file_names(&session), ["second.txt"]);

        let trash = session.trash_view().await.unwrap();
        assert_eq!(trash.files.len(), 1);
        assert_eq!(trash.files[0].name, "first.txt");
    }

    #[tokio::test]
    async fn restore_returns_a_file_to_its_folder() {
        let (backend, mut session) = seeded_session().await;
        let docs = backend.seed_folder("Docs", None);
        let file = backend.seed_file("inside.txt", Some(docs.id), b"i");
        session.enter(docs.id).await.unwrap();

        session.trash_file(file.id).await.unwrap();
        assert!(session.files().is_empty());

        session.restore_file(file.id).await.unwrap();
        assert_eq!(file_names(&session), ["inside.txt"]);
        assert!(session.trash_view().await.unwrap().files.is_empty());
    }

    #[tokio::test]
    async fn folders_trash_and_restore_without_an_undo_prompt() {
        let (_backend, mut session) = seeded_session().await;
        let folder = session.create_folder("Archive").await.unwrap();

        session.trash_folder(folder.id).await.unwrap();
        assert!(session.folders().is_empty());
        assert!(session.pending_undo().is_none());

        let trash = session.trash_view().await.unwrap();
        assert_eq!(trash.folders.len(), 1);

        session.restore_folder(folder.id).await.unwrap();
        assert_eq!(folder_names(&session), ["Archive"]);
    }

    #[tokio::test]
    async fn purge_removes_blob_and_row() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("old.txt", None, b"o");
        session.refresh().await.unwrap();
        session.trash_file(file.id).await.unwrap();

        let trash = session.trash_view().await.unwrap();
        session.purge_file(&trash.files[0]).await.unwrap();

        assert!(backend.blob(&file.storage_key).is_none());
        assert!(session.trash_view().await.unwrap().files.is_empty());
    }

    #[tokio::test]
    async fn purge_aborts_when_the_blob_removal_fails() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("stuck.txt", None, b"s");
        session.refresh().await.unwrap();
        session.trash_file(file.id).await.unwrap();

        backend.fail_next(BackendOp::RemoveBlob, AppError::storage("disk error"));
        let trash = session.trash_view().await.unwrap();
        let err = session.purge_file(&trash.files[0]).await.unwrap_err();
        assert_eq!(err.message, "disk error");

        // Row and blob both survive the aborted purge.
        assert!(backend.blob(&file.storage_key).is_some());
        assert_eq!(session.trash_view().await.unwrap().files.len(), 1);
    }

    #[tokio::test]
    async fn purging_a_folder_leaves_its_contents_in_the_trash() {
        let (backend, mut session) = seeded_session().await;
        let docs = backend.seed_folder("Docs", None);
        let file = backend.seed_file("kept.txt", Some(docs.id), b"k");
        session.refresh().await.unwrap();

        session.trash_folder(docs.id).await.unwrap();
        session.trash_file(file.id).await.unwrap();
        session.purge_folder(docs.id).await.unwrap();

        let trash = session.trash_view().await.unwrap();
        assert!(trash.folders.is_empty());
        assert_eq!(trash.files.len(), 1);
        assert_eq!(trash.files[0].name, "kept.txt");
    }

    #[tokio::test]
    async fn open_signs_the_file_blob() {
        let (backend, mut session) = seeded_session().await;
        let file = backend.seed_file("photo.png", None, b"png");
        session.refresh().await.unwrap();

        let shown = session.files()[0].clone();
        let link = session.open(&shown).await.unwrap();
        assert!(link.url.contains(&file.storage_key));
    }

    #[tokio::test]
    async fn usage_counts_only_live_files() {
        let (backend, mut session) = seeded_session().await;
        backend.set_quota(1000, 80);
        backend.seed_file("a.bin", None, &[0u8; 600]);
        let trashed = backend.seed_file("b.bin", None, &[0u8; 300]);
        session.refresh().await.unwrap();
        session.trash_file(trashed.id).await.unwrap();

        let usage = session.usage().await.unwrap();
        assert_eq!(usage.used_bytes, 600);
        assert_eq!(usage.percent(), 60);
        assert!(!usage.is_warning());
    }

    #[tokio::test]
    async fn filter_matches_names_case_insensitively() {
        let (backend, mut session) = seeded_session().await;
        backend.seed_folder("Photos", None);
        backend.seed_file("Quarterly Report.pdf", None, b"q");
        backend.seed_file("notes.txt", None, b"n");
        session.refresh().await.unwrap();

        session.set_filter("report");
        assert_eq!(session.visible_files().len(), 1);
        assert!(session.visible_folders().is_empty());

        session.set_filter("PHOT");
        assert_eq!(session.visible_folders().len(), 1);
        assert!(session.visible_files().is_empty());

        session.set_filter("  ");
        assert_eq!(session.visible_files().len(), 2);
        assert_eq!(session.visible_folders().len(), 1);
    }
}
