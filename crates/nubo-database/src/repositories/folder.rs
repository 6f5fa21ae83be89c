//! Folder repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use nubo_core::error::{AppError, ErrorKind};
use nubo_core::result::AppResult;
use nubo_core::types::FolderScope;
use nubo_entity::folder::{CreateFolder, Folder, FolderUpdate};

/// Repository for folder rows.
///
/// All queries are scoped by `user_id`; a folder belonging to another user
/// behaves exactly like a folder that does not exist.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List non-trashed folders under the given scope.
    pub async fn list(&self, user_id: Uuid, scope: FolderScope) -> AppResult<Vec<Folder>> {
        let query = match scope.parent_id() {
            Some(parent_id) => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders \
                 WHERE user_id = ? AND parent_id = ? AND is_trashed = 0 \
                 ORDER BY name ASC",
            )
            .bind(user_id)
            .bind(parent_id),
            None => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders \
                 WHERE user_id = ? AND parent_id IS NULL AND is_trashed = 0 \
                 ORDER BY name ASC",
            )
            .bind(user_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// List all trashed folders for a user.
    pub async fn list_trashed(&self, user_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE user_id = ? AND is_trashed = 1 \
             ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed folders", e)
        })
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, user_id, name, parent_id, is_trashed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 0, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    /// Apply a partial update (rename and/or trash flag) to a folder.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &FolderUpdate,
    ) -> AppResult<Folder> {
        if update.is_empty() {
            return Err(AppError::validation("Folder update changes nothing"));
        }

        let mut sets: Vec<&str> = Vec::new();
        if update.name.is_some() {
            sets.push("name = ?");
        }
        if update.is_trashed.is_some() {
            sets.push("is_trashed = ?");
        }
        let sql = format!(
            "UPDATE folders SET {}, updated_at = ? WHERE id = ? AND user_id = ? RETURNING *",
            sets.join(", ")
        );

        let mut query = sqlx::query_as::<_, Folder>(&sql);
        if let Some(name) = &update.name {
            query = query.bind(name);
        }
        if let Some(trashed) = update.is_trashed {
            query = query.bind(trashed);
        }

        query
            .bind(Utc::now())
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Delete a folder row. Never cascades.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
