use crate::{
    errors::{ApiError, ApiResult},
    forms::{CleanImage, PostForm},
    models::{Attachment, Post},
    store::Store,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

const IMAGE_DIR: &str = "posts";

fn store_image(store: &Store, image: CleanImage) -> String {
    store.insert_attachment(Attachment {
        path: format!("{IMAGE_DIR}/{}", image.file_name),
        content_type: image.content_type.to_string(),
        bytes: image.bytes,
    })
}

pub fn create_post(store: &Store, author_id: Uuid, form: &PostForm) -> ApiResult<Post> {
    let clean = form.clean(store)?;
    let image = clean.image.map(|image| store_image(store, image));

    let post = store.insert_post(Post {
        id: 0,
        text: clean.text,
        pub_date: Utc::now(),
        author_id,
        group_id: clean.group_id,
        image,
    });

    info!("Post created: {} by user {}", post.id, author_id);

    Ok(post)
}

/// The post, if `requester` may edit it. Someone else's post looks exactly
/// like a missing one.
pub fn editable_post(store: &Store, requester: Uuid, post_id: i64) -> ApiResult<Post> {
    let post = store.post(post_id).ok_or(ApiError::NotFound)?;
    if post.author_id != requester {
        return Err(ApiError::NotFound);
    }
    Ok(post)
}

/// Rewrites text, group and image in place. Author and `pub_date` never change;
/// without a new upload the current image is kept, and a replaced image is
/// dropped from storage.
pub fn edit_post(store: &Store, requester: Uuid, post_id: i64, form: &PostForm) -> ApiResult<Post> {
    let mut post = editable_post(store, requester, post_id)?;
    let clean = form.clean(store)?;

    post.text = clean.text;
    post.group_id = clean.group_id;
    let stored = clean.image.map(|image| store_image(store, image));
    let replaced = match &stored {
        Some(path) => post.image.replace(path.clone()),
        None => None,
    };

    if !store.update_post(post.clone()) {
        if let Some(path) = stored {
            store.remove_attachment(&path);
        }
        return Err(ApiError::NotFound);
    }
    if let Some(path) = replaced {
        store.remove_attachment(&path);
    }

    info!("Post edited: {} by user {}", post.id, requester);

    Ok(post)
}

pub fn delete_post(store: &Store, requester: Uuid, post_id: i64) -> ApiResult<Post> {
    editable_post(store, requester, post_id)?;
    let post = store.delete_post(post_id).ok_or(ApiError::NotFound)?;

    info!("Post deleted: {} by user {}", post_id, requester);

    Ok(post)
}
