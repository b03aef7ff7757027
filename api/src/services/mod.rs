//! Domain operations over the store. Handlers in `routes` only translate HTTP
//! to these calls and render the results.

pub mod comment;
pub mod feed;
pub mod follow;
pub mod group;
pub mod post;

#[cfg(test)]
pub(crate) mod testing {
    use crate::{models::{Post, User}, store::Store};
    use chrono::Utc;
    use uuid::Uuid;

    /// A 2x1 GIF that decodes cleanly.
    pub const SMALL_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
    ];

    pub fn user(store: &Store, username: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: format!("{username}@example.com"),
            username: username.to_string(),
            hashed_password: String::new(),
            created_at: Utc::now().timestamp(),
        };
        assert!(store.insert_user(user.clone()));
        user
    }

    pub fn post(store: &Store, author: &User, group_id: Option<i64>, text: &str) -> Post {
        store.insert_post(Post {
            id: 0,
            text: text.to_string(),
            pub_date: Utc::now(),
            author_id: author.id,
            group_id,
            image: None,
        })
    }
}
