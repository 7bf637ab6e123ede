use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;
use crate::error::DomainError;
use crate::slug::slugify;

pub type PostId = i32;

/// Post entity - a blog post together with its comments and tag names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub public: bool,
    pub locked: bool,
    pub posted_time: DateTime<Utc>,
    pub edited_time: Option<DateTime<Utc>>,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Post {
    /// Fail with [`DomainError::Locked`] if the post no longer takes comments.
    pub fn ensure_accepts_comments(&self) -> Result<(), DomainError> {
        if self.locked {
            return Err(DomainError::Locked {
                post_id: self.id.into(),
            });
        }
        Ok(())
    }
}

/// The admin-editable fields of a post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub public: bool,
    pub locked: bool,
    pub summary: String,
    pub content: String,
}

/// A post ready to be inserted: slug derived and posted time stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub public: bool,
    pub locked: bool,
    pub posted_time: DateTime<Utc>,
    pub summary: String,
    pub content: String,
}

impl NewPost {
    pub fn from_draft(draft: PostDraft, now: DateTime<Utc>) -> Self {
        Self {
            slug: slugify(&draft.title),
            title: draft.title,
            public: draft.public,
            locked: draft.locked,
            posted_time: now,
            summary: draft.summary,
            content: draft.content,
        }
    }
}

/// Changes applied to an existing post.
///
/// There is no posted time here: it is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostUpdate {
    pub title: String,
    pub slug: String,
    pub public: bool,
    pub locked: bool,
    pub edited_time: DateTime<Utc>,
    pub summary: String,
    pub content: String,
}

impl PostUpdate {
    pub fn from_draft(draft: PostDraft, now: DateTime<Utc>) -> Self {
        Self {
            slug: slugify(&draft.title),
            title: draft.title,
            public: draft.public,
            locked: draft.locked,
            edited_time: now,
            summary: draft.summary,
            content: draft.content,
        }
    }
}

/// Which posts a listing should return.
///
/// `query` is a case-insensitive substring matched against title, summary and
/// content; `tag` is an exact tag name. Both may be combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub query: Option<String>,
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            public: true,
            locked: false,
            summary: "summary".to_string(),
            content: "content".to_string(),
        }
    }

    #[test]
    fn test_new_post_derives_slug_and_posted_time() {
        let now = Utc::now();
        let post = NewPost::from_draft(draft("Hello World"), now);

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.posted_time, now);
    }

    #[test]
    fn test_update_recomputes_slug_and_stamps_edit() {
        let later = Utc::now() + TimeDelta::minutes(5);
        let update = PostUpdate::from_draft(draft("Second Thoughts"), later);

        assert_eq!(update.slug, "second-thoughts");
        assert_eq!(update.edited_time, later);
    }

    #[test]
    fn test_locked_post_rejects_comments() {
        let mut post = Post {
            id: 7,
            title: "t".to_string(),
            slug: "t".to_string(),
            public: true,
            locked: false,
            posted_time: Utc::now(),
            edited_time: None,
            summary: String::new(),
            content: String::new(),
            comments: Vec::new(),
            tags: Vec::new(),
        };
        assert!(post.ensure_accepts_comments().is_ok());

        post.locked = true;
        assert!(matches!(
            post.ensure_accepts_comments(),
            Err(DomainError::Locked { post_id: 7 })
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let post = Post {
            id: 1,
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            public: true,
            locked: false,
            posted_time: Utc::now(),
            edited_time: None,
            summary: String::new(),
            content: String::new(),
            comments: Vec::new(),
            tags: vec!["news".to_string()],
        };

        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("postedTime").is_some());
        assert!(json["editedTime"].is_null());
        assert_eq!(json["tags"], serde_json::json!(["news"]));
        assert_eq!(json["comments"], serde_json::json!([]));
    }
}
