//! File metadata handlers — listing, registration, rename, trash, purge.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use nubo_core::types::FolderScope;
use nubo_entity::file::{File, FileUpdate};
use nubo_service::file::RegisterFile;

use crate::dto::request::{ListFilesQuery, RegisterFileRequest, UpdateFileRequest, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/files
///
/// `?folder=root|<uuid>` scopes the listing. `?trashed=true` lists the
/// trash instead, ignoring scope.
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<File>>>> {
    let files = if query.trashed.unwrap_or(false) {
        state.file_service.list_trashed(auth.context()).await?
    } else {
        let scope = query.folder.unwrap_or(FolderScope::Root);
        state.file_service.list(auth.context(), scope).await?
    };

    Ok(Json(ApiResponse::ok(files)))
}

/// POST /api/files
///
/// Registers a metadata row for a blob the client has already uploaded.
pub async fn register_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RegisterFileRequest>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let req = validated(req)?;

    let file = state
        .file_service
        .register(
            auth.context(),
            RegisterFile {
                folder: req.folder.unwrap_or(FolderScope::Root),
                name: req.name,
                size_bytes: req.size_bytes,
                storage_key: req.storage_key,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state.file_service.get(auth.context(), id).await?;

    Ok(Json(ApiResponse::ok(file)))
}

/// PATCH /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFileRequest>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let req = validated(req)?;

    let update = FileUpdate {
        name: req.name,
        is_trashed: req.is_trashed,
    };
    let file = state.file_service.update(auth.context(), id, update).await?;

    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}
///
/// Removes the metadata row only. Clients delete the blob first and
/// abort if that fails, so a row is never orphaned silently.
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.file_service.delete(auth.context(), id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "File deleted".to_string(),
    })))
}
