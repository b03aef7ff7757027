use crate::{
    models::{Comment, Group, Post, User},
    pagination::{PER_PAGE, Page},
    services::feed::{GroupFeed, PostDetail, Profile},
    store::Store,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Characters of the post text used in the detail page title.
const TITLE_CHARS: usize = 30;
pub const MEDIA_URL: &str = "/media/";

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Public view of a user, without the email.
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthorResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,
    pub group: Option<GroupResponse>,
    /// URL of the attached image.
    pub image: Option<String>,
}

impl PostResponse {
    /// Resolves the author and group references against the store.
    pub fn render(store: &Store, post: Post) -> Self {
        Self {
            id: post.id,
            author: store.username_of(post.author_id).unwrap_or_default(),
            group: post.group_id.and_then(|id| store.group(id)).map(Into::into),
            image: post.image.map(|path| format!("{MEDIA_URL}{path}")),
            text: post.text,
            pub_date: post.pub_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl CommentResponse {
    pub fn render(store: &Store, comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: store.username_of(comment.author_id).unwrap_or_default(),
            text: comment.text,
            created: comment.created,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginatedResponse<PostResponse> {
    pub fn posts(store: &Store, page: Page<Post>) -> Self {
        let (has_next, has_previous) = (page.has_next(), page.has_previous());
        let page = page.map(|post| PostResponse::render(store, post));
        Self {
            data: page.items,
            page: page.number,
            num_pages: page.num_pages,
            per_page: PER_PAGE,
            total: page.total,
            has_next,
            has_previous,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupFeedResponse {
    pub group: GroupResponse,
    #[serde(flatten)]
    pub posts: PaginatedResponse<PostResponse>,
}

impl GroupFeedResponse {
    pub fn render(store: &Store, feed: GroupFeed) -> Self {
        Self {
            group: feed.group.into(),
            posts: PaginatedResponse::posts(store, feed.page),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub author: AuthorResponse,
    pub post_count: usize,
    pub following: bool,
    #[serde(flatten)]
    pub posts: PaginatedResponse<PostResponse>,
}

impl ProfileResponse {
    pub fn render(store: &Store, profile: Profile) -> Self {
        Self {
            author: profile.author.into(),
            post_count: profile.post_count,
            following: profile.following,
            posts: PaginatedResponse::posts(store, profile.page),
        }
    }
}

/// Describes the comment form shown under a post.
#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

pub const COMMENT_FORM: &[FormField] = &[FormField {
    name: "text",
    kind: "textarea",
    required: true,
}];

pub const POST_FORM: &[FormField] = &[
    FormField {
        name: "text",
        kind: "textarea",
        required: true,
    },
    FormField {
        name: "group",
        kind: "choice",
        required: false,
    },
    FormField {
        name: "image",
        kind: "image",
        required: false,
    },
];

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub title: String,
    pub post: PostResponse,
    pub post_count: usize,
    pub comments: Vec<CommentResponse>,
    pub form: &'static [FormField],
}

impl PostDetailResponse {
    pub fn render(store: &Store, detail: PostDetail) -> Self {
        let title: String = detail.post.text.chars().take(TITLE_CHARS).collect();
        Self {
            title: format!("Post {title}"),
            post: PostResponse::render(store, detail.post),
            post_count: detail.author_post_count,
            comments: detail
                .comments
                .into_iter()
                .map(|c| CommentResponse::render(store, c))
                .collect(),
            form: COMMENT_FORM,
        }
    }
}

/// Everything needed to draw the create/edit form.
#[derive(Debug, Serialize)]
pub struct PostFormResponse {
    pub is_edit: bool,
    pub post: Option<PostResponse>,
    pub groups: Vec<GroupResponse>,
    pub form: &'static [FormField],
}

impl PostFormResponse {
    pub fn render(store: &Store, post: Option<Post>) -> Self {
        Self {
            is_edit: post.is_some(),
            post: post.map(|p| PostResponse::render(store, p)),
            groups: store.groups().into_iter().map(Into::into).collect(),
            form: POST_FORM,
        }
    }
}
