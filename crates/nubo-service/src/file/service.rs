//! File metadata CRUD scoped to the requesting user.
//!
//! File *contents* never pass through here. Blob bytes go through
//! [`BlobService`](crate::blob::BlobService), and clients sequence the
//! two themselves (blob first on upload, blob first on purge).

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use nubo_core::error::AppError;
use nubo_core::types::FolderScope;
use nubo_database::repositories::file::FileRepository;
use nubo_entity::file::{CreateFile, File, FileUpdate};

use crate::context::RequestContext;

/// Manages file metadata rows.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
}

/// Request to register an uploaded blob as a file row.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterFile {
    /// Containing folder (root for top level).
    pub folder: FolderScope,
    /// Display name.
    pub name: String,
    /// Size of the uploaded blob in bytes.
    pub size_bytes: i64,
    /// Key of the already-uploaded blob.
    pub storage_key: String,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<FileRepository>) -> Self {
        Self { file_repo }
    }

    /// Lists the user's active files in the given scope, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        scope: FolderScope,
    ) -> Result<Vec<File>, AppError> {
        self.file_repo.list(ctx.user_id, scope).await
    }

    /// Lists the user's trashed files.
    pub async fn list_trashed(&self, ctx: &RequestContext) -> Result<Vec<File>, AppError> {
        self.file_repo.list_trashed(ctx.user_id).await
    }

    /// Gets a file by ID.
    pub async fn get(&self, ctx: &RequestContext, file_id: Uuid) -> Result<File, AppError> {
        self.file_repo
            .find_by_id(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Registers a file row for a blob the user has already uploaded.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        req: RegisterFile,
    ) -> Result<File, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if req.size_bytes < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }
        require_owned_key(ctx, &req.storage_key)?;

        let file = self
            .file_repo
            .create(&CreateFile {
                user_id: ctx.user_id,
                folder_id: req.folder.parent_id(),
                name: name.to_string(),
                size_bytes: req.size_bytes,
                storage_key: req.storage_key,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            size_bytes = file.size_bytes,
            "File registered"
        );

        Ok(file)
    }

    /// Applies a partial update (rename and/or trash flag) to a file.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        mut update: FileUpdate,
    ) -> Result<File, AppError> {
        if let Some(name) = update.name.take() {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("File name cannot be empty"));
            }
            update.name = Some(name.to_string());
        }

        let file = self.file_repo.update(ctx.user_id, file_id, &update).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File updated");

        Ok(file)
    }

    /// Permanently deletes a file row. The blob is the caller's problem.
    pub async fn delete(&self, ctx: &RequestContext, file_id: Uuid) -> Result<(), AppError> {
        let deleted = self.file_repo.delete(ctx.user_id, file_id).await?;
        if !deleted {
            return Err(AppError::not_found("File not found"));
        }

        info!(user_id = %ctx.user_id, file_id = %file_id, "File row deleted");

        Ok(())
    }
}

/// Rejects storage keys that do not live under the user's own prefix.
pub(crate) fn require_owned_key(ctx: &RequestContext, key: &str) -> Result<(), AppError> {
    let prefix = ctx.user_id.to_string();
    match key.split_once('/') {
        Some((first, rest)) if first == prefix && !rest.is_empty() => Ok(()),
        _ => Err(AppError::authorization(
            "Storage key does not belong to the current user",
        )),
    }
}
