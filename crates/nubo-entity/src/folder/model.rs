//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in a user's drive.
///
/// Folders form a tree through `parent_id`; a `None` parent means the
/// folder sits at the root of the drive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The folder name.
    pub name: String,
    /// The parent folder, or `None` at the root.
    pub parent_id: Option<Uuid>,
    /// Whether the folder is in the trash.
    pub is_trashed: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root-level folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The owning user.
    pub user_id: Uuid,
    /// The folder name.
    pub name: String,
    /// The parent folder, or `None` for the root.
    pub parent_id: Option<Uuid>,
}

/// A partial metadata update for a folder.
///
/// Fields left as `None` are not touched. Rename and trash flag changes
/// both go through this shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderUpdate {
    /// New folder name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New trash flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trashed: Option<bool>,
}

impl FolderUpdate {
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
