//! Domain entities - the core business objects.

pub mod aggregate;
mod comment;
mod post;
mod tag;

pub use aggregate::{PostAggregator, PostRow, aggregate_posts};
pub use comment::{Comment, CommentId, NewComment};
pub use post::{NewPost, Post, PostDraft, PostFilter, PostId, PostUpdate};
pub use tag::{
    TAG_NAME_MAX_LEN, TAG_NAME_MIN_LEN, Tag, TagId, assignable_tag_names, is_valid_tag_name,
};
