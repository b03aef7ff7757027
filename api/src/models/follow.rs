use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `user_id` sees posts by `author_id` in their follow feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub user_id: Uuid,
    pub author_id: Uuid,
}
