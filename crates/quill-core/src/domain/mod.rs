//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;

pub use comment::Comment;
pub use post::{AuthoredPost, Post, PostDraft, MAX_SLUG_LEN, MAX_TITLE_LEN};
pub use user::{User, MAX_USERNAME_LEN};
