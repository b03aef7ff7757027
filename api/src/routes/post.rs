use crate::{
    auth::CurrentUser,
    dto::{PostDetailResponse, PostFormResponse},
    errors::{ApiError, ApiResult},
    forms::{CommentForm, PostForm, Upload},
    routes::{parse_id, post_url, profile_url},
    services::{comment, feed, post},
    states::AppState,
};
use axum::{
    Form, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Redirect,
};

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Malformed form data: {}", e))
}

/// Collects the `text`, `group` and `image` fields of a multipart post form.
/// Unknown fields are ignored.
async fn read_post_form(mut multipart: Multipart) -> ApiResult<PostForm> {
    let mut form = PostForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => form.text = field.text().await.map_err(bad_multipart)?,
            "group" => form.group = field.text().await.map_err(bad_multipart)?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                form.image = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// GET /posts/{id}/
pub async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostDetailResponse>> {
    let detail = feed::post_detail(&state.store, parse_id(&id)?)?;
    Ok(Json(PostDetailResponse::render(&state.store, detail)))
}

/// GET /create/
/// Headers: Authorization: Bearer <token>
pub async fn create_form(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Json<PostFormResponse> {
    Json(PostFormResponse::render(&state.store, None))
}

/// POST /create/
/// Headers: Authorization: Bearer <token>
/// Body: multipart form with `text`, optional `group` id and optional `image`
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> ApiResult<Redirect> {
    let form = read_post_form(multipart).await?;
    post::create_post(&state.store, user.id, &form)?;
    Ok(Redirect::to(&profile_url(&user.username)))
}

/// GET /posts/{id}/edit/
/// Only the author gets the form; everybody else gets a 404.
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PostFormResponse>> {
    let editable = post::editable_post(&state.store, user.id, parse_id(&id)?)?;
    Ok(Json(PostFormResponse::render(&state.store, Some(editable))))
}

/// POST /posts/{id}/edit/
pub async fn edit_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Redirect> {
    let post_id = parse_id(&id)?;
    // Ownership is checked before the body is read.
    post::editable_post(&state.store, user.id, post_id)?;

    let form = read_post_form(multipart).await?;
    let edited = post::edit_post(&state.store, user.id, post_id, &form)?;
    Ok(Redirect::to(&post_url(edited.id)))
}

/// DELETE /posts/{id}/
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    post::delete_post(&state.store, user.id, parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/{id}/comment/
/// Body: urlencoded `text=...`
///
/// An empty comment is dropped without complaint; either way the caller lands
/// back on the post.
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> ApiResult<Redirect> {
    let post_id = parse_id(&id)?;
    match form.clean() {
        Ok(text) => {
            comment::add_comment(&state.store, post_id, user.id, text)?;
        }
        Err(_) => {
            state.store.post(post_id).ok_or(ApiError::NotFound)?;
        }
    }
    Ok(Redirect::to(&post_url(post_id)))
}
