//! Folding of flat post/comment/tag join rows into nested posts.
//!
//! A listing query joins every post with all of its comments and all of its
//! tags, so a post with N comments and M tags arrives as up to N*M rows.
//! [`PostAggregator`] collapses that fan-out back into one [`Post`] per id.

use std::collections::HashMap;

use super::{Comment, Post, PostId, Tag};

/// One row of the post/comment/tag join.
///
/// `comment` and `tag` are `None` when the outer join found nothing, so a
/// post without comments or tags never grows phantom entries.
#[derive(Debug, Clone)]
pub struct PostRow {
    pub post: Post,
    pub comment: Option<Comment>,
    pub tag: Option<Tag>,
}

/// Accumulates join rows keyed by post id, in first-seen order.
#[derive(Debug, Default)]
pub struct PostAggregator {
    order: Vec<PostId>,
    posts: HashMap<PostId, Post>,
}

impl PostAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row in.
    ///
    /// The first row for a post id creates the post shell; later rows for the
    /// same id only contribute a comment not seen yet (by id) and a tag not
    /// seen yet (by name).
    pub fn accumulate(&mut self, row: PostRow) {
        let PostRow { post, comment, tag } = row;
        let id = post.id;

        let entry = self.posts.entry(id).or_insert_with(|| {
            self.order.push(id);
            Post {
                comments: Vec::new(),
                tags: Vec::new(),
                ..post
            }
        });

        if let Some(comment) = comment {
            if !entry.comments.iter().any(|c| c.id == comment.id) {
                entry.comments.push(comment);
            }
        }

        if let Some(tag) = tag {
            if !entry.tags.iter().any(|name| *name == tag.name) {
                entry.tags.push(tag.name);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Posts in the order their ids were first seen.
    pub fn finish(mut self) -> Vec<Post> {
        self.order
            .iter()
            .filter_map(|id| self.posts.remove(id))
            .collect()
    }
}

/// Fold a whole row stream at once.
pub fn aggregate_posts<I>(rows: I) -> Vec<Post>
where
    I: IntoIterator<Item = PostRow>,
{
    let mut aggregator = PostAggregator::new();
    for row in rows {
        aggregator.accumulate(row);
    }
    aggregator.finish()
}
