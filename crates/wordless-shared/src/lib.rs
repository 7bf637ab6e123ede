//! # Wordless Shared
//!
//! Wire types of the HTTP API: request bodies accepted by the server and the
//! problem document returned on errors.

pub mod dto;
pub mod response;

pub use dto::{CommentRequest, LoginRequest, PostRequest, PrincipalResponse};
pub use response::ErrorResponse;
