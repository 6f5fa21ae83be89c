//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file stored in a user's drive.
///
/// The row is metadata only; the bytes live in the blob store under
/// `storage_key`. The row and the blob are written by separate calls, so
/// either can exist without the other after a partial failure.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The containing folder, or `None` at the root.
    pub folder_id: Option<Uuid>,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Opaque key addressing the blob in the blob store.
    pub storage_key: String,
    /// Whether the file is in the trash.
    pub is_trashed: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The owning user.
    pub user_id: Uuid,
    /// The containing folder, or `None` for the root.
    pub folder_id: Option<Uuid>,
    /// The file name.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Blob store key where the bytes were written.
    pub storage_key: String,
}

/// A partial metadata update for a file.
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileUpdate {
    /// New file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New trash flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trashed: Option<bool>,
}

impl FileUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_trashed.is_none()
    }

    /// An update that only renames.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_trashed: None,
        }
    }

    /// An update that only sets the trash flag.
    pub fn set_trashed(trashed: bool) -> Self {
        Self {
            name: None,
            is_trashed: Some(trashed),
        }
    }
}
