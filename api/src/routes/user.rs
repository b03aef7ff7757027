use crate::{
    auth::{CurrentUser, create_token, hash_password, verify_password},
    dto::{AuthResponse, LoginQuery, LoginRequest, SignupRequest, UserResponse},
    errors::{ApiError, LOGIN_URL},
    models::User,
    states::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Usernames end up in URLs, so only letters, digits and `@.+-_` are allowed.
fn check_username(username: &str) -> Result<(), ValidationErrors> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_username");
    error.message = Some("Username may contain only letters, numbers, and @/./+/-/_".into());
    let mut errors = ValidationErrors::new();
    errors.add("username", error);
    Err(errors)
}

/// POST /auth/signup/
/// Body: { "email": "...", "username": "...", "password": "..." }
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;
    check_username(&payload.username)?;

    let hashed_password = hash_password(&payload.password, state.config.bcrypt_cost)?;

    let user = User {
        id: Uuid::new_v4(),
        email: payload.email,
        username: payload.username,
        hashed_password,
        created_at: Utc::now().timestamp(),
    };

    if !state.store.insert_user(user.clone()) {
        return Err(ApiError::AlreadyExists("User"));
    }

    let token = create_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    info!("New user registered: {}", user.username);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /auth/login/?next=/path/
/// Where anonymous visitors of protected pages are redirected to.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
      "detail": "Authentication credentials were not provided.",
      "login": LOGIN_URL,
      "next": query.next.unwrap_or_else(|| "/".to_string())
    }))
}

/// POST /auth/login/
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let user = state
        .store
        .user_by_email(&payload.email)
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.hashed_password)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    info!("User logged in: {}", user.username);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /users/me/
/// Headers: Authorization: Bearer <token>
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
