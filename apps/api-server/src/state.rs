//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::DbConn;

use wordless_core::ports::{
    AuthError, CommentRepository, CredentialStore, PostRepository, TagRepository, TokenService,
};
use wordless_infra::{
    ContentSeeder, InMemoryCredentialStore, JwtTokenService, SeaCommentRepository,
    SeaPostRepository, SeaSettingsRepository, SeaTagRepository, ensure_signing_key,
};

use crate::config::AuthConfig;

/// How auth cookies are issued.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age_seconds: i64,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub credentials: Arc<dyn CredentialStore>,
    pub cookies: CookieSettings,
}

impl AppState {
    /// Wire repositories and auth services over a migrated database.
    ///
    /// Loads (or on first boot creates) the token signing key.
    pub async fn init(db: DbConn, auth: &AuthConfig) -> Result<Self, AuthError> {
        let settings = SeaSettingsRepository::new(db.clone());
        let key = ensure_signing_key(&settings).await?;

        let tokens = JwtTokenService::new(&key, auth.jwt.clone());
        let cookies = CookieSettings {
            secure: auth.cookie_secure,
            max_age_seconds: tokens.expiration_seconds(),
        };
        let credentials =
            InMemoryCredentialStore::with_admin(auth.admin_username.clone(), &auth.admin_password)?;

        tracing::info!(admin = %auth.admin_username, "Application state initialized");

        Ok(Self {
            posts: Arc::new(SeaPostRepository::new(db.clone())),
            comments: Arc::new(SeaCommentRepository::new(db.clone())),
            tags: Arc::new(SeaTagRepository::new(db)),
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
            cookies,
        })
    }

    pub fn seeder(&self) -> ContentSeeder {
        ContentSeeder::new(self.posts.clone(), self.comments.clone(), self.tags.clone())
    }
}
