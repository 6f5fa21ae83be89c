//! Auth handlers — register, login, logout, me.

use axum::Json;
use axum::extract::State;

use nubo_entity::user::User;
use nubo_service::auth::AuthResponse;

use crate::dto::request::{LoginRequest, RegisterRequest, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let req = validated(req)?;

    let result = state
        .auth_service
        .register(&req.email, &req.password, req.display_name)
        .await?;

    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let req = validated(req)?;

    let result = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth_service.logout(auth.context()).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.auth_service.current_user(auth.context()).await?;

    Ok(Json(ApiResponse::ok(user)))
}
