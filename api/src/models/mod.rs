mod attachment;
mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use attachment::Attachment;
pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use post::Post;
pub use user::User;
