use axum::body::Bytes;

/// An uploaded image kept by the store and served under `/media/`.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub path: String,
    pub content_type: String,
    pub bytes: Bytes,
}
