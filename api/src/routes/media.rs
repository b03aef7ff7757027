use crate::{errors::ApiError, states::AppState};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

/// GET /media/{*path}
pub async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let attachment = state.store.attachment(&path).ok_or(ApiError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, attachment.content_type)], attachment.bytes))
}
