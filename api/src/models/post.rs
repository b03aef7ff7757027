use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters of the text used when a post is displayed inline.
const DISPLAY_CHARS: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    /// Path of the attached image inside the media store, e.g. `posts/cat.gif`.
    pub image: Option<String>,
}

impl Post {
    /// Newest first; ids break ties between posts published in the same instant.
    pub fn feed_order(a: &Post, b: &Post) -> std::cmp::Ordering {
        b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id))
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short: String = self.text.chars().take(DISPLAY_CHARS).collect();
        f.write_str(&short)
    }
}
