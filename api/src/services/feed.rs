use crate::{
    errors::{ApiError, ApiResult},
    models::{Comment, Group, Post, User},
    pagination::Page,
    store::Store,
};
use uuid::Uuid;

pub struct GroupFeed {
    pub group: Group,
    pub page: Page<Post>,
}

pub struct Profile {
    pub author: User,
    pub page: Page<Post>,
    pub post_count: usize,
    /// Whether the viewer already follows `author`; always false when anonymous.
    pub following: bool,
}

pub struct PostDetail {
    pub post: Post,
    /// How many posts the post's author has written in total.
    pub author_post_count: usize,
    pub comments: Vec<Comment>,
}

pub fn list_index(store: &Store, page: usize) -> Page<Post> {
    Page::paginate(store.all_posts(), page)
}

pub fn list_group(store: &Store, slug: &str, page: usize) -> ApiResult<GroupFeed> {
    let group = store.group_by_slug(slug).ok_or(ApiError::NotFound)?;
    let page = Page::paginate(store.posts_by_group(group.id), page);
    Ok(GroupFeed { group, page })
}

pub fn list_profile(
    store: &Store,
    username: &str,
    viewer: Option<Uuid>,
    page: usize,
) -> ApiResult<Profile> {
    let author = store.user_by_username(username).ok_or(ApiError::NotFound)?;
    let posts = store.posts_by_author(author.id);
    let post_count = posts.len();
    let following = viewer.is_some_and(|viewer| store.follow_exists(viewer, author.id));

    Ok(Profile {
        author,
        page: Page::paginate(posts, page),
        post_count,
        following,
    })
}

pub fn list_follow_feed(store: &Store, viewer: Uuid, page: usize) -> Page<Post> {
    Page::paginate(store.posts_by_followed(viewer), page)
}

pub fn post_detail(store: &Store, post_id: i64) -> ApiResult<PostDetail> {
    let post = store.post(post_id).ok_or(ApiError::NotFound)?;
    Ok(PostDetail {
        author_post_count: store.count_posts_by_author(post.author_id),
        comments: store.comments_by_post(post.id),
        post,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{post, user};

    #[test]
    fn index_lists_everything_newest_first() {
        let store = Store::new();
        let author = user(&store, "tester");
        post(&store, &author, None, "old");
        post(&store, &author, None, "new");

        let page = list_index(&store, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].text, "new");
    }

    #[test]
    fn group_listing_paginates_thirteen_posts() {
        let store = Store::new();
        let author = user(&store, "tester");
        let group = store
            .insert_group("Test group".into(), "test_slug".into(), String::new())
            .unwrap();
        for i in 1..=13 {
            post(&store, &author, Some(group.id), &format!("post {i}"));
        }

        assert_eq!(list_group(&store, "test_slug", 1).unwrap().page.items.len(), 10);
        assert_eq!(list_group(&store, "test_slug", 2).unwrap().page.items.len(), 3);
        assert!(list_group(&store, "test_slug", 3).unwrap().page.items.is_empty());
    }

    #[test]
    fn unknown_group_is_not_found() {
        let store = Store::new();
        assert!(matches!(list_group(&store, "nope", 1), Err(ApiError::NotFound)));
    }

    #[test]
    fn post_stays_out_of_other_groups() {
        let store = Store::new();
        let author = user(&store, "tester");
        let group = store.insert_group("A".into(), "a".into(), String::new()).unwrap();
        store.insert_group("B".into(), "b".into(), String::new()).unwrap();
        post(&store, &author, Some(group.id), "in a");

        assert!(list_group(&store, "b", 1).unwrap().page.items.is_empty());
    }

    #[test]
    fn profile_reports_count_and_follow_state() {
        let store = Store::new();
        let author = user(&store, "author");
        let reader = user(&store, "reader");
        for i in 0..12 {
            post(&store, &author, None, &format!("post {i}"));
        }

        let anonymous = list_profile(&store, "author", None, 2).unwrap();
        assert_eq!(anonymous.post_count, 12);
        assert_eq!(anonymous.page.items.len(), 2);
        assert!(!anonymous.following);

        store.get_or_create_follow(reader.id, author.id);
        let followed = list_profile(&store, "author", Some(reader.id), 1).unwrap();
        assert!(followed.following);

        assert!(matches!(
            list_profile(&store, "ghost", None, 1),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn follow_feed_only_shows_followed_authors() {
        let store = Store::new();
        let author = user(&store, "author");
        let follower = user(&store, "follower");
        let bystander = user(&store, "bystander");
        store.get_or_create_follow(follower.id, author.id);
        post(&store, &author, None, "fresh post");

        let feed = list_follow_feed(&store, follower.id, 1);
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].text, "fresh post");
        assert!(list_follow_feed(&store, bystander.id, 1).items.is_empty());
    }

    #[test]
    fn detail_includes_comments_and_author_count() {
        let store = Store::new();
        let author = user(&store, "author");
        let first = post(&store, &author, None, "first");
        post(&store, &author, None, "second");
        crate::services::comment::add_comment(&store, first.id, author.id, "Comment text".into())
            .unwrap();

        let detail = post_detail(&store, first.id).unwrap();
        assert_eq!(detail.author_post_count, 2);
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].text, "Comment text");
        assert!(matches!(post_detail(&store, 999), Err(ApiError::NotFound)));
    }
}
