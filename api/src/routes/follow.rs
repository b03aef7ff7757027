use crate::{
    auth::CurrentUser,
    errors::ApiResult,
    routes::profile_url,
    services::follow,
    states::AppState,
};
use axum::{
    extract::{Path, State},
    response::Redirect,
};

/// GET|POST /profile/{username}/follow/
pub async fn profile_follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> ApiResult<Redirect> {
    let author = follow::follow(&state.store, user.id, &username)?;
    Ok(Redirect::to(&profile_url(&author.username)))
}

/// GET|POST /profile/{username}/unfollow/
pub async fn profile_unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> ApiResult<Redirect> {
    let author = follow::unfollow(&state.store, user.id, &username)?;
    Ok(Redirect::to(&profile_url(&author.username)))
}
