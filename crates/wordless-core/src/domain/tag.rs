use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub type TagId = i32;

/// Shortest accepted tag name, in characters.
pub const TAG_NAME_MIN_LEN: usize = 2;
/// Longest accepted tag name, in characters.
pub const TAG_NAME_MAX_LEN: usize = 49;

/// Tag entity - a free-text label attached to any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Whether `name` may be assigned to a post.
pub fn is_valid_tag_name(name: &str) -> bool {
    (TAG_NAME_MIN_LEN..=TAG_NAME_MAX_LEN).contains(&name.chars().count())
}

/// Reduce a submitted tag list to the names that will actually be assigned.
///
/// Names outside the accepted length are dropped rather than rejected, and
/// repeats keep only their first occurrence.
pub fn assignable_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| is_valid_tag_name(name.as_ref()))
        .filter(|name| seen.insert(name.as_ref().to_string()))
        .map(|name| name.as_ref().to_string())
        .collect()
}
