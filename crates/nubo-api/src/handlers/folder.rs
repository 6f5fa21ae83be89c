//! Folder handlers — listing, creation, rename, trash, and purge.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use nubo_core::types::FolderScope;
use nubo_entity::folder::{Folder, FolderUpdate};

use crate::dto::request::{CreateFolderRequest, ListFoldersQuery, UpdateFolderRequest, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/folders
///
/// `?parent=root|<uuid>` scopes the listing. `?trashed=true` lists the
/// trash instead, ignoring scope.
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFoldersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let folders = if query.trashed.unwrap_or(false) {
        state.folder_service.list_trashed(auth.context()).await?
    } else {
        let scope = query.parent.unwrap_or(FolderScope::Root);
        state.folder_service.list(auth.context(), scope).await?
    };

    Ok(Json(ApiResponse::ok(folders)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let req = validated(req)?;
    let scope = req.parent.unwrap_or(FolderScope::Root);

    let folder = state
        .folder_service
        .create(auth.context(), &req.name, scope)
        .await?;

    Ok(Json(ApiResponse::ok(folder)))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state.folder_service.get(auth.context(), id).await?;

    Ok(Json(ApiResponse::ok(folder)))
}

/// PATCH /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFolderRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let req = validated(req)?;

    let update = FolderUpdate {
        name: req.name,
        is_trashed: req.is_trashed,
    };
    let folder = state
        .folder_service
        .update(auth.context(), id, update)
        .await?;

    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.folder_service.delete(auth.context(), id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Folder deleted".to_string(),
    })))
}
