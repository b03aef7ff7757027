use crate::{
    errors::{ApiError, ApiResult},
    models::User,
    store::Store,
};
use tracing::info;
use uuid::Uuid;

/// Makes `follower` follow `author_username`. Repeating the call is harmless and
/// following yourself is silently ignored. Returns the resolved author.
pub fn follow(store: &Store, follower: Uuid, author_username: &str) -> ApiResult<User> {
    let author = store
        .user_by_username(author_username)
        .ok_or(ApiError::NotFound)?;

    if author.id != follower {
        let (_, created) = store.get_or_create_follow(follower, author.id);
        if created {
            info!("User {} now follows {}", follower, author.username);
        }
    }

    Ok(author)
}

/// Removes the edge if there is one; otherwise a no-op.
pub fn unfollow(store: &Store, follower: Uuid, author_username: &str) -> ApiResult<User> {
    let author = store
        .user_by_username(author_username)
        .ok_or(ApiError::NotFound)?;

    if author.id != follower && store.delete_follow(follower, author.id) {
        info!("User {} unfollowed {}", follower, author.username);
    }

    Ok(author)
}
