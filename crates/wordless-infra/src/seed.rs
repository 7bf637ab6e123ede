//! Demo content for a fresh installation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use wordless_core::domain::{NewComment, NewPost, PostDraft, PostId};
use wordless_core::error::RepoError;
use wordless_core::ports::{CommentRepository, PostRepository, TagRepository};

const LOREM_CONTENT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua.\n\n## Ut enim ad\n\nminim veniam, \
quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.\n\nDuis aute \
irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. \
Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim \
id est laborum.";

/// Fills an empty blog with a handful of posts, comments and tags.
pub struct ContentSeeder {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
}

impl ContentSeeder {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
        }
    }

    /// Seed unless any post exists. Returns whether content was created.
    pub async fn seed(&self) -> Result<bool, RepoError> {
        let existing = self.posts.count().await?;
        if existing > 0 {
            tracing::debug!(existing, "Posts present, skipping demo content");
            return Ok(false);
        }

        let now = Utc::now();

        match self.tags.insert("unused").await {
            Ok(_) | Err(RepoError::Constraint(_)) => {}
            Err(e) => return Err(e),
        }

        let hello = self
            .post("hello world", "world", "hello world", false, now - TimeDelta::hours(1))
            .await?;
        self.tag(hello, &["hello-world", "lorem-ipsum"]).await?;
        self.comment(hello, "aleksi", "## spam", now).await?;
        self.comment(hello, "iskela", "maps", now - TimeDelta::minutes(30))
            .await?;

        let lorem = self
            .post("lorem ipsum", "dolor sit amet", LOREM_CONTENT, false, now)
            .await?;
        self.tag(lorem, &["lorem-ipsum"]).await?;
        self.comment(lorem, "aleksi", "# hello!", now).await?;

        self.post("test post", "test summary", "test content", true, now)
            .await?;

        let kitten = self
            .post(
                "Look at this kitten!",
                "## It's _so_ cute!",
                "![alt text](https://placekitten.com/600/400 \"title text\")",
                true,
                now,
            )
            .await?;
        self.tag(kitten, &["cute-animals"]).await?;
        self.comment(
            kitten,
            "me",
            "# you're righT!\n\n![](https://placekitten.com/200/200)",
            now,
        )
        .await?;

        tracing::info!("Seeded demo content");
        Ok(true)
    }

    async fn post(
        &self,
        title: &str,
        summary: &str,
        content: &str,
        locked: bool,
        posted_time: DateTime<Utc>,
    ) -> Result<PostId, RepoError> {
        let draft = PostDraft {
            title: title.to_string(),
            public: true,
            locked,
            summary: summary.to_string(),
            content: content.to_string(),
        };
        self.posts
            .insert(NewPost::from_draft(draft, posted_time))
            .await
    }

    async fn tag(&self, post_id: PostId, names: &[&str]) -> Result<(), RepoError> {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        self.tags.set_post_tags(post_id, &names).await
    }

    async fn comment(
        &self,
        post_id: PostId,
        author: &str,
        content: &str,
        posted_time: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        self.comments
            .insert(NewComment::new(
                post_id,
                author.to_string(),
                content.to_string(),
                posted_time,
            ))
            .await
            .map(|_| ())
    }
}
