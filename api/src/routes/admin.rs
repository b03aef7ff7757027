use crate::{
    dto::GroupResponse,
    errors::{ApiError, ApiResult},
    forms::GroupForm,
    services::group,
    states::AppState,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::info;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin endpoints pretend not to exist unless the caller presents the
/// configured token.
fn require_admin(headers: &HeaderMap, state: &AppState) -> ApiResult<()> {
    let expected = state.config.admin_token.as_deref().ok_or(ApiError::NotFound)?;
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::NotFound)?;
    if presented != expected {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

/// POST /admin/groups/
/// Headers: X-Admin-Token: <token>
/// Body: { "title": "...", "slug": "...", "description": "..." }
pub async fn create_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GroupForm>,
) -> ApiResult<(StatusCode, Json<GroupResponse>)> {
    require_admin(&headers, &state)?;
    let group = group::create_group(&state.store, payload)?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

/// POST /admin/cache/clear/
pub async fn clear_cache(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    require_admin(&headers, &state)?;
    state.cache.clear();
    info!("Page cache cleared");
    Ok(StatusCode::NO_CONTENT)
}
