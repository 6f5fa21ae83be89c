//! Blob handlers — raw byte upload and delete, signed URL issue and serve.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use nubo_core::error::AppError;
use nubo_service::blob::SignedUrlGrant;

use crate::dto::request::{ServeBlobQuery, SignRequest, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// PUT /api/storage/blobs/{*key}
///
/// Uploads raw bytes under the given key. The key's first path segment
/// must be the caller's own user ID.
pub async fn upload_blob(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.blob_service.put(auth.context(), &key, body).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Blob stored".to_string(),
    })))
}

/// DELETE /api/storage/blobs/{*key}
pub async fn delete_blob(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.blob_service.remove(auth.context(), &key).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Blob removed".to_string(),
    })))
}

/// POST /api/storage/sign
///
/// Issues a short-lived signed URL for one of the caller's blobs.
pub async fn sign_blob(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SignRequest>,
) -> ApiResult<Json<ApiResponse<SignedUrlGrant>>> {
    let req = validated(req)?;

    let grant = state
        .blob_service
        .sign(auth.context(), &req.storage_key)
        .await?;

    Ok(Json(ApiResponse::ok(grant)))
}

/// GET /api/storage/signed/{token}
///
/// Serves the blob a signed token grants access to. No session is
/// required: the token itself is the credential, so the URL works from
/// a plain browser tab until it expires.
pub async fn serve_signed(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<ServeBlobQuery>,
) -> ApiResult<Response> {
    let content = state.blob_service.open(&token).await?;

    let mime = content
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = if query.download.unwrap_or(false) {
        format!("attachment; filename=\"{}\"", content.filename)
    } else {
        format!("inline; filename=\"{}\"", content.filename)
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(content.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
