use async_trait::async_trait;

use crate::domain::{
    Comment, CommentId, NewComment, NewPost, Post, PostFilter, PostId, PostUpdate, Tag, TagId,
};
use crate::error::RepoError;

/// Post repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts matching `filter`, newest first, each with all comments and tags.
    async fn find(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// One post with its comments and tags.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Insert a post and return its generated id.
    async fn insert(&self, post: NewPost) -> Result<PostId, RepoError>;

    /// Apply `update`. Fails with [`RepoError::NotFound`] if the post is gone.
    async fn update(&self, id: PostId, update: PostUpdate) -> Result<(), RepoError>;

    /// Delete a post together with its comments and tag links.
    /// Deleting a missing post is not an error.
    async fn delete(&self, id: PostId) -> Result<(), RepoError>;

    /// Number of stored posts.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of a post, newest first.
    async fn find_by_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError>;

    async fn insert(&self, comment: NewComment) -> Result<CommentId, RepoError>;

    /// Delete comment `id` of post `post_id`. Missing comments are ignored.
    async fn delete(&self, post_id: PostId, id: CommentId) -> Result<(), RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Tags attached to at least one post, sorted by name.
    async fn find_used(&self) -> Result<Vec<Tag>, RepoError>;

    /// Tags of one post, sorted by name.
    async fn find_by_post(&self, post_id: PostId) -> Result<Vec<Tag>, RepoError>;

    /// Create a free-standing tag.
    async fn insert(&self, name: &str) -> Result<TagId, RepoError>;

    /// Replace the post's tag links with `names`, atomically.
    ///
    /// Names outside the accepted length are silently dropped and repeats are
    /// linked once; unknown names create new tags.
    async fn set_post_tags(&self, post_id: PostId, names: &[String]) -> Result<(), RepoError>;
}

/// Key/value settings store.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Value of `key`; `None` if the key is absent or its value is null.
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError>;

    /// Store `value` under `key` unless the key already exists.
    /// Returns whether this call inserted it.
    async fn insert_if_absent(&self, key: &str, value: Option<&str>) -> Result<bool, RepoError>;

    /// Create or overwrite `key`.
    async fn set(&self, key: &str, value: Option<&str>) -> Result<(), RepoError>;

    async fn delete(&self, key: &str) -> Result<(), RepoError>;
}
