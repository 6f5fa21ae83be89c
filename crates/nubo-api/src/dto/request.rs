//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use nubo_core::error::AppError;
use nubo_core::types::FolderScope;

/// Runs declarative validation and folds failures into one message.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(req)
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Parent scope. Missing means the root.
    pub parent: Option<FolderScope>,
}

/// Partial folder update: rename and/or move in or out of the trash.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New trash flag.
    pub is_trashed: Option<bool>,
}

/// Register an uploaded blob as a file row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterFileRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Containing folder scope. Missing means the root.
    pub folder: Option<FolderScope>,
    /// Blob size in bytes.
    pub size_bytes: i64,
    /// Key of the already-uploaded blob.
    #[validate(length(min = 1))]
    pub storage_key: String,
}

/// Partial file update: rename and/or move in or out of the trash.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFileRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New trash flag.
    pub is_trashed: Option<bool>,
}

/// Request for a signed download URL.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignRequest {
    /// Blob key to grant access to.
    #[validate(length(min = 1))]
    pub storage_key: String,
}

/// Listing filter for folder collections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFoldersQuery {
    /// Scope to list under. Missing means the root.
    pub parent: Option<FolderScope>,
    /// When true, list the trash instead (scope is ignored).
    pub trashed: Option<bool>,
}

/// Listing filter for file collections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilesQuery {
    /// Scope to list in. Missing means the root.
    pub folder: Option<FolderScope>,
    /// When true, list the trash instead (scope is ignored).
    pub trashed: Option<bool>,
}

/// Disposition switch for the signed download endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServeBlobQuery {
    /// When true, serve as an attachment instead of inline.
    pub download: Option<bool>,
}
