use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PostId;

pub type CommentId = i32;

/// Comment entity - a visitor's comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: String,
    pub posted_time: DateTime<Utc>,
    pub content: String,
}

/// A comment ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author: String,
    pub posted_time: DateTime<Utc>,
    pub content: String,
}

impl NewComment {
    pub fn new(post_id: PostId, author: String, content: String, now: DateTime<Utc>) -> Self {
        Self {
            post_id,
            author,
            posted_time: now,
            content,
        }
    }
}
