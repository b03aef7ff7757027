use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::error;
use validator::ValidationErrors;

pub const LOGIN_URL: &str = "/auth/login/";

/// Escaped inside a `next=` query value. `/` stays readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Login page that sends the user back to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!("{LOGIN_URL}?next={}", utf8_percent_encode(next, QUERY_VALUE))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    /// The endpoint needs an authenticated user; `next` is where to come back to.
    #[error("Login required")]
    LoginRequired { next: String },
    #[error("Not Found")]
    NotFound,
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Convert our custom errors to HTTP responses
///
/// Edits of someone else's post are reported through `NotFound` as well, so the
/// response never tells whether the post exists.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::AlreadyExists(what) => {
                return (
                    StatusCode::CONFLICT,
                    Json(serde_json::json!({
                      "error": format!("{what} already exists")
                    })),
                )
                    .into_response();
            }
            ApiError::LoginRequired { next } => {
                return Redirect::to(&login_url(&next)).into_response();
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::Validation(errors) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "errors": errors
                    })),
                )
                    .into_response();
            }
            ApiError::BadRequest(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn login_required_redirects_with_next() {
        let response = ApiError::LoginRequired {
            next: "/posts/1/comment/".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth/login/?next=/posts/1/comment/"
        );
    }

    #[test]
    fn next_is_encoded_as_query_value() {
        assert_eq!(login_url("/profile/a+b/follow/"), "/auth/login/?next=/profile/a%2Bb/follow/");
        assert_eq!(login_url("/x/a&b=c/"), "/auth/login/?next=/x/a%26b%3Dc/");
        assert_eq!(login_url("/profile/%D0%92/"), "/auth/login/?next=/profile/%25D0%2592/");
    }

    #[test]
    fn not_found_is_404() {
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn validation_errors_are_400() {
        let mut errors = ValidationErrors::new();
        errors.add("text", validator::ValidationError::new("required"));
        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
