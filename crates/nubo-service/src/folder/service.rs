//! Folder CRUD scoped to the requesting user.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use nubo_core::error::{AppError, ErrorKind};
use nubo_core::types::FolderScope;
use nubo_database::repositories::folder::FolderRepository;
use nubo_entity::folder::{CreateFolder, Folder, FolderUpdate};

use crate::context::RequestContext;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Lists the user's active folders directly under the given scope.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        scope: FolderScope,
    ) -> Result<Vec<Folder>, AppError> {
        self.folder_repo.list(ctx.user_id, scope).await
    }

    /// Lists the user's trashed folders, most recently trashed first.
    pub async fn list_trashed(&self, ctx: &RequestContext) -> Result<Vec<Folder>, AppError> {
        self.folder_repo.list_trashed(ctx.user_id).await
    }

    /// Gets a folder by ID.
    pub async fn get(&self, ctx: &RequestContext, folder_id: Uuid) -> Result<Folder, AppError> {
        self.folder_repo
            .find_by_id(ctx.user_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// Creates a new folder under the given scope.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: FolderScope,
    ) -> Result<Folder, AppError> {
        let name = clean_name(name)?;

        // A nested folder must hang off a folder the user actually owns.
        if let Some(parent_id) = parent.parent_id() {
            self.get(ctx, parent_id).await.map_err(|e| {
                if e.kind == ErrorKind::NotFound {
                    AppError::not_found("Parent folder not found")
                } else {
                    e
                }
            })?;
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                user_id: ctx.user_id,
                name,
                parent_id: parent.parent_id(),
            })
            .await?;

        info!(user_id = %ctx.user_id, folder_id = %folder.id, "Folder created");

        Ok(folder)
    }

    /// Applies a partial update (rename and/or trash flag) to a folder.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        mut update: FolderUpdate,
    ) -> Result<Folder, AppError> {
        if let Some(name) = update.name.take() {
            update.name = Some(clean_name(&name)?);
        }

        let folder = self
            .folder_repo
            .update(ctx.user_id, folder_id, &update)
            .await?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder updated");

        Ok(folder)
    }

    /// Permanently deletes a folder row.
    ///
    /// Contents are left in place. Files and subfolders keep their
    /// dangling reference and remain reachable through the trash view.
    pub async fn delete(&self, ctx: &RequestContext, folder_id: Uuid) -> Result<(), AppError> {
        let deleted = self.folder_repo.delete(ctx.user_id, folder_id).await?;
        if !deleted {
            return Err(AppError::not_found("Folder not found"));
        }

        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder deleted");

        Ok(())
    }
}

/// Trims a folder name and rejects empty results.
fn clean_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(name.to_string())
}
