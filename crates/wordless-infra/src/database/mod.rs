//! Database connection management and SeaORM repositories.

mod base;
mod comment_repo;
mod connections;
pub mod entity;
mod post_repo;
mod settings_repo;
mod tag_repo;

pub use base::SeaRepository;
pub use comment_repo::SeaCommentRepository;
pub use connections::{DatabaseConfig, connect};
pub use post_repo::SeaPostRepository;
pub use settings_repo::SeaSettingsRepository;
pub use tag_repo::SeaTagRepository;
