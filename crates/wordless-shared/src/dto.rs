//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Login form, accepted as JSON or `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn default_true() -> bool {
    true
}

/// Body of post create and update.
///
/// `tags: None` leaves the post's tags alone; `Some` replaces them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Body of a new comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub author: String,
    pub content: String,
}

/// The caller's identity as seen by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub username: String,
    pub roles: Vec<String>,
}
