use crate::models::{Attachment, Comment, Follow, Group, Post, User};
use dashmap::{DashMap, mapref::entry::Entry};
use std::{
    collections::HashSet,
    sync::atomic::{AtomicI64, Ordering},
};
use uuid::Uuid;

/// In-memory relational store.
///
/// Every table is a `DashMap`; unique columns get their own index map so that
/// "insert if absent" is a single `entry` call and never races.
#[derive(Default)]
pub struct Store {
    users: DashMap<Uuid, User>,
    email_index: DashMap<String, Uuid>,
    username_index: DashMap<String, Uuid>,
    groups: DashMap<i64, Group>,
    slug_index: DashMap<String, i64>,
    posts: DashMap<i64, Post>,
    comments: DashMap<i64, Comment>,
    follows: DashMap<(Uuid, Uuid), Follow>,
    attachments: DashMap<String, Attachment>,
    group_seq: AtomicI64,
    post_seq: AtomicI64,
    comment_seq: AtomicI64,
    follow_seq: AtomicI64,
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::Relaxed) + 1
}

fn sorted(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(Post::feed_order);
    posts
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- users -------------------------------------------------------------

    /// Returns `false` if the email or username is already taken.
    pub fn insert_user(&self, user: User) -> bool {
        let email_slot = match self.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(slot) => slot.insert(user.id),
        };
        drop(email_slot);

        match self.username_index.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                self.email_index.remove(&user.email);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user);
                true
            }
        }
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let id = *self.email_index.get(email)?;
        self.user(id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        let id = *self.username_index.get(username)?;
        self.user(id)
    }

    pub fn username_of(&self, id: Uuid) -> Option<String> {
        self.users.get(&id).map(|u| u.username.clone())
    }

    // ---- groups ------------------------------------------------------------

    /// Returns `None` if the slug is taken.
    pub fn insert_group(&self, title: String, slug: String, description: String) -> Option<Group> {
        match self.slug_index.entry(slug.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let group = Group {
                    id: next_id(&self.group_seq),
                    title,
                    slug,
                    description,
                };
                slot.insert(group.id);
                self.groups.insert(group.id, group.clone());
                Some(group)
            }
        }
    }

    pub fn group(&self, id: i64) -> Option<Group> {
        self.groups.get(&id).map(|g| g.clone())
    }

    pub fn group_by_slug(&self, slug: &str) -> Option<Group> {
        let id = *self.slug_index.get(slug)?;
        self.group(id)
    }

    pub fn group_exists(&self, id: i64) -> bool {
        self.groups.contains_key(&id)
    }

    /// All groups ordered by title.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.iter().map(|g| g.value().clone()).collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        groups
    }

    // ---- posts -------------------------------------------------------------

    /// Assigns an id to `post` and stores it.
    pub fn insert_post(&self, mut post: Post) -> Post {
        post.id = next_id(&self.post_seq);
        self.posts.insert(post.id, post.clone());
        post
    }

    pub fn bulk_insert_posts(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().map(|p| self.insert_post(p)).collect()
    }

    /// Overwrites a stored post. Returns `false` if it no longer exists.
    pub fn update_post(&self, post: Post) -> bool {
        match self.posts.get_mut(&post.id) {
            Some(mut stored) => {
                *stored = post;
                true
            }
            None => false,
        }
    }

    /// Hard delete; the post's comments go with it.
    pub fn delete_post(&self, id: i64) -> Option<Post> {
        let (_, post) = self.posts.remove(&id)?;
        self.comments.retain(|_, c| c.post_id != id);
        if let Some(image) = &post.image {
            self.attachments.remove(image);
        }
        Some(post)
    }

    pub fn post(&self, id: i64) -> Option<Post> {
        self.posts.get(&id).map(|p| p.clone())
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    fn posts_where(&self, predicate: impl Fn(&Post) -> bool) -> Vec<Post> {
        sorted(
            self.posts
                .iter()
                .filter(|entry| predicate(entry.value()))
                .map(|entry| entry.value().clone())
                .collect(),
        )
    }

    pub fn all_posts(&self) -> Vec<Post> {
        self.posts_where(|_| true)
    }

    pub fn posts_by_group(&self, group_id: i64) -> Vec<Post> {
        self.posts_where(|p| p.group_id == Some(group_id))
    }

    pub fn posts_by_author(&self, author_id: Uuid) -> Vec<Post> {
        self.posts_where(|p| p.author_id == author_id)
    }

    pub fn count_posts_by_author(&self, author_id: Uuid) -> usize {
        self.posts.iter().filter(|p| p.author_id == author_id).count()
    }

    /// Posts written by anyone `user_id` follows.
    pub fn posts_by_followed(&self, user_id: Uuid) -> Vec<Post> {
        let authors: HashSet<Uuid> = self
            .follows
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.key().1)
            .collect();
        if authors.is_empty() {
            return vec![];
        }
        self.posts_where(|p| authors.contains(&p.author_id))
    }

    // ---- comments ----------------------------------------------------------

    pub fn insert_comment(&self, mut comment: Comment) -> Comment {
        comment.id = next_id(&self.comment_seq);
        self.comments.insert(comment.id, comment.clone());
        comment
    }

    /// Oldest first.
    pub fn comments_by_post(&self, post_id: i64) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| c.value().clone())
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        comments
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    // ---- follows -----------------------------------------------------------

    /// Creates the edge unless it already exists; returns the stored edge and
    /// whether it was created by this call.
    pub fn get_or_create_follow(&self, user_id: Uuid, author_id: Uuid) -> (Follow, bool) {
        match self.follows.entry((user_id, author_id)) {
            Entry::Occupied(edge) => (edge.get().clone(), false),
            Entry::Vacant(slot) => {
                let follow = Follow {
                    id: next_id(&self.follow_seq),
                    user_id,
                    author_id,
                };
                slot.insert(follow.clone());
                (follow, true)
            }
        }
    }

    pub fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> bool {
        self.follows.remove(&(user_id, author_id)).is_some()
    }

    pub fn follow_exists(&self, user_id: Uuid, author_id: Uuid) -> bool {
        self.follows.contains_key(&(user_id, author_id))
    }

    pub fn follow_count(&self) -> usize {
        self.follows.len()
    }

    // ---- attachments -------------------------------------------------------

    /// Stores the upload under `path`, or under a suffixed variant of it when
    /// `path` is taken. Returns the path actually used.
    pub fn insert_attachment(&self, mut attachment: Attachment) -> String {
        loop {
            match self.attachments.entry(attachment.path.clone()) {
                Entry::Vacant(slot) => {
                    let path = attachment.path.clone();
                    slot.insert(attachment);
                    return path;
                }
                Entry::Occupied(_) => attachment.path = with_suffix(&attachment.path),
            }
        }
    }

    pub fn attachment(&self, path: &str) -> Option<Attachment> {
        self.attachments.get(path).map(|a| a.clone())
    }

    pub fn remove_attachment(&self, path: &str) -> Option<Attachment> {
        self.attachments.remove(path).map(|(_, attachment)| attachment)
    }
}

/// `posts/cat.gif` -> `posts/cat_1a2b3c4d.gif`
fn with_suffix(path: &str) -> String {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));
    let renamed = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{file}_{suffix}"),
    };
    if dir.is_empty() {
        renamed
    } else {
        format!("{dir}/{renamed}")
    }
}
