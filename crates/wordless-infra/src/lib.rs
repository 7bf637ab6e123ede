//! # Wordless Infrastructure
//!
//! Concrete implementations of the ports defined in `wordless-core`:
//! SeaORM repositories, JWT and Argon2 authentication, and demo content.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL driver
//! - `sqlite` - SQLite driver, used by the test suites

pub mod auth;
pub mod database;
pub mod seed;

pub use auth::{InMemoryCredentialStore, JwtConfig, JwtTokenService, ensure_signing_key};
pub use database::{
    DatabaseConfig, SeaCommentRepository, SeaPostRepository, SeaSettingsRepository,
    SeaTagRepository, connect,
};
pub use seed::ContentSeeder;
