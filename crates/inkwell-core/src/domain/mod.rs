//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{Post, PostDraft, PostStatus, PostSubmission, PublishedPost, UnknownStatus};
pub use tag::Tag;
pub use user::User;
