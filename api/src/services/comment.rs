use crate::{
    errors::{ApiError, ApiResult},
    models::Comment,
    store::Store,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// `text` must already be validated (see `forms::CommentForm`).
pub fn add_comment(store: &Store, post_id: i64, author_id: Uuid, text: String) -> ApiResult<Comment> {
    let post = store.post(post_id).ok_or(ApiError::NotFound)?;

    let comment = store.insert_comment(Comment {
        id: 0,
        post_id: post.id,
        author_id,
        text,
        created: Utc::now(),
    });

    info!("Comment {} added to post {} by user {}", comment.id, post.id, author_id);

    Ok(comment)
}
