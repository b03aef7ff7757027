pub mod admin;
pub mod feed;
pub mod follow;
pub mod health;
pub mod media;
pub mod post;
pub mod user;

use crate::errors::{ApiError, ApiResult};
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Ids in paths that are not numbers simply do not exist.
pub(crate) fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Escaped inside a single path segment such as a username.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", utf8_percent_encode(username, PATH_SEGMENT))
}

pub(crate) fn post_url(id: i64) -> String {
    format!("/posts/{id}/")
}

/// A body that was already rendered to JSON, e.g. one coming from the cache.
pub(crate) fn json_body(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub async fn handler_404() -> ApiError {
    ApiError::NotFound
}
