//! # Wordless Core
//!
//! The domain layer of the Wordless blog.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! posts, comments and tags, slug generation, the row reducer that folds joined
//! post/comment/tag rows, and the ports that storage and auth backends implement.

pub mod domain;
pub mod error;
pub mod ports;
pub mod slug;

pub use error::{DomainError, RepoError};
pub use slug::slugify;
