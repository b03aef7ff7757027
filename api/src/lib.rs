//! Blog service: posts, groups, comments and follow-based feeds over HTTP.

pub mod auth;
pub mod cache;
pub mod config;
pub mod dto;
pub mod errors;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod states;
pub mod store;

pub use config::Config;
pub use states::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full router around `state`.
pub fn app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_in_flight = state.config.max_concurrent_requests;

    Router::new()
        // Feeds
        .route("/", get(routes::feed::index))
        .route("/group/{slug}/", get(routes::feed::group_posts))
        .route("/profile/{username}/", get(routes::feed::profile))
        .route("/follow/", get(routes::feed::follow_index))
        // Follow management (auth required)
        .route(
            "/profile/{username}/follow/",
            get(routes::follow::profile_follow).post(routes::follow::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            get(routes::follow::profile_unfollow).post(routes::follow::profile_unfollow),
        )
        // Posts
        .route(
            "/create/",
            get(routes::post::create_form).post(routes::post::create_post),
        )
        .route(
            "/posts/{id}/",
            get(routes::post::post_detail).delete(routes::post::delete_post),
        )
        .route(
            "/posts/{id}/edit/",
            get(routes::post::edit_form).post(routes::post::edit_post),
        )
        .route("/posts/{id}/comment/", post(routes::post::add_comment))
        .route("/media/{*path}", get(routes::media::serve_media))
        // Accounts
        .route("/auth/signup/", post(routes::user::signup))
        .route(
            "/auth/login/",
            get(routes::user::login_page).post(routes::user::login),
        )
        .route("/users/me/", get(routes::user::get_current_user))
        // Administration
        .route("/admin/groups/", post(routes::admin::create_group))
        .route("/admin/cache/clear/", post(routes::admin::clear_cache))
        .route("/health", get(routes::health::health_check))
        .fallback(routes::handler_404)
        // Add state and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(max_in_flight))
}
