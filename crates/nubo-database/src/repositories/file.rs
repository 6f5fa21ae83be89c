//! File repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use nubo_core::error::{AppError, ErrorKind};
use nubo_core::result::AppResult;
use nubo_core::types::FolderScope;
use nubo_entity::file::{CreateFile, File, FileUpdate};

/// Repository for file metadata rows.
///
/// All queries are scoped by `user_id`. Listings return newest files
/// first.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a file by its blob storage key.
    pub async fn find_by_storage_key(&self, user_id: Uuid, key: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE storage_key = ? AND user_id = ?")
            .bind(key)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by key", e)
            })
    }

    /// List non-trashed files in the given scope, newest first.
    pub async fn list(&self, user_id: Uuid, scope: FolderScope) -> AppResult<Vec<File>> {
        let query = match scope.parent_id() {
            Some(folder_id) => sqlx::query_as::<_, File>(
                "SELECT * FROM files \
                 WHERE user_id = ? AND folder_id = ? AND is_trashed = 0 \
                 ORDER BY created_at DESC",
            )
            .bind(user_id)
            .bind(folder_id),
            None => sqlx::query_as::<_, File>(
                "SELECT * FROM files \
                 WHERE user_id = ? AND folder_id IS NULL AND is_trashed = 0 \
                 ORDER BY created_at DESC",
            )
            .bind(user_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List all trashed files for a user, newest first.
    pub async fn list_trashed(&self, user_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = ? AND is_trashed = 1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed files", e)
        })
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        sqlx::query_as::<_, File>(
            "INSERT INTO files \
             (id, user_id, folder_id, name, size_bytes, storage_key, is_trashed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(data.size_bytes)
        .bind(&data.storage_key)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "Storage key '{}' is already in use",
                    data.storage_key
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    /// Apply a partial update (rename and/or trash flag) to a file.
    pub async fn update(&self, user_id: Uuid, id: Uuid, update: &FileUpdate) -> AppResult<File> {
        if update.is_empty() {
            return Err(AppError::validation("File update changes nothing"));
        }

        let mut sets: Vec<&str> = Vec::new();
        if update.name.is_some() {
            sets.push("name = ?");
        }
        if update.is_trashed.is_some() {
            sets.push("is_trashed = ?");
        }
        let sql = format!(
            "UPDATE files SET {}, updated_at = ? WHERE id = ? AND user_id = ? RETURNING *",
            sets.join(", ")
        );

        let mut query = sqlx::query_as::<_, File>(&sql);
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
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Delete a file row.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Total bytes used by a user's non-trashed files.
    pub async fn sum_size(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM files \
             WHERE user_id = ? AND is_trashed = 0",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e))
    }
}
