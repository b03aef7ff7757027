use crate::{
    auth::{CurrentUser, Viewer},
    dto::{GroupFeedResponse, PaginatedResponse, PostResponse, ProfileResponse},
    errors::{ApiError, ApiResult},
    pagination::PageParams,
    routes::json_body,
    services::feed,
    states::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use tracing::debug;

/// GET /?page=1
///
/// The rendered page is cached for `index_cache_ttl`; until it expires (or an
/// admin clears the cache) every request gets the same body, even if posts
/// were added or deleted in the meantime.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Response> {
    let number = params.number();
    let key = format!("index:page={number}");

    if let Some(body) = state.cache.get(&key) {
        debug!("Index page {} served from cache", number);
        return Ok(json_body(body));
    }

    let page = feed::list_index(&state.store, number);
    let body = serde_json::to_string(&PaginatedResponse::posts(&state.store, page))
        .map_err(|e| ApiError::InternalError(format!("Rendering index failed: {}", e)))?;
    state
        .cache
        .put(&key, body.clone(), state.config.index_cache_ttl);

    Ok(json_body(body))
}

/// GET /group/{slug}/?page=1
pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<GroupFeedResponse>> {
    let group_feed = feed::list_group(&state.store, &slug, params.number())?;
    Ok(Json(GroupFeedResponse::render(&state.store, group_feed)))
}

/// GET /profile/{username}/?page=1
pub async fn profile(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ProfileResponse>> {
    let viewer = viewer.map(|user| user.id);
    let profile = feed::list_profile(&state.store, &username, viewer, params.number())?;
    Ok(Json(ProfileResponse::render(&state.store, profile)))
}

/// GET /follow/?page=1
/// Headers: Authorization: Bearer <token>
pub async fn follow_index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Json<PaginatedResponse<PostResponse>> {
    let page = feed::list_follow_feed(&state.store, user.id, params.number());
    Json(PaginatedResponse::posts(&state.store, page))
}
