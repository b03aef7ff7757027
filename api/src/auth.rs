use crate::{errors::ApiError, models::User, states::AppState};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub exp: usize,
}

pub fn create_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String, ApiError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| ApiError::InternalError("Failed to calculate expiration".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalError(format!("Token Creation failed: {}", e)))
}

/// Decodes the bearer token, if there is a valid one.
pub fn validate_token(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, ApiError> {
    bcrypt::verify(password, hashed)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))
}

fn user_from_headers(headers: &HeaderMap, state: &AppState) -> Option<User> {
    let claims = validate_token(headers, &state.config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub).ok()?;
    state.store.user(user_id)
}

/// The authenticated caller. Requests without valid credentials are sent to
/// the login page with `next` pointing back at the requested path.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        user_from_headers(&parts.headers, state)
            .map(CurrentUser)
            .ok_or_else(|| ApiError::LoginRequired {
                next: parts.uri.path().to_string(),
            })
    }
}

/// Whoever is looking at a public page; `None` for anonymous visitors.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<User>);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Viewer(user_from_headers(&parts.headers, state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "tester@example.com".into(),
            username: "tester".into(),
            hashed_password: String::new(),
            created_at: Utc::now().timestamp(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn token_round_trip() {
        let user = user();
        let token = create_token(&user, "secret", 24).unwrap();
        let claims = validate_token(&bearer(&token), "secret").unwrap();
        assert_eq!(claims.sub, user.id.to_string());
    }

    #[test]
    fn wrong_secret_or_scheme_is_rejected() {
        let token = create_token(&user(), "secret", 24).unwrap();
        assert!(validate_token(&bearer(&token), "other").is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&token).unwrap());
        assert!(validate_token(&headers, "secret").is_none());
        assert!(validate_token(&HeaderMap::new(), "secret").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = create_token(&user(), "secret", -2).unwrap();
        assert!(validate_token(&bearer(&token), "secret").is_none());
    }

    #[test]
    fn password_hash_verifies() {
        let hashed = hash_password("correct horse", 4).unwrap();
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("battery staple", &hashed).unwrap());
    }
}
