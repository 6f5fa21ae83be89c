//! Storage usage handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, UsageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/usage
pub async fn get_usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UsageResponse>>> {
    let usage = state.usage_service.usage(auth.context()).await?;

    Ok(Json(ApiResponse::ok(usage.into())))
}
