//! Authentication and authorization ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles a principal may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
        }
    }
}

/// An authenticated identity known to the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Claims carried by a validated token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: String,
    pub issuer: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject` as of `issued_at`.
    fn generate_token_at(&self, subject: &str, issued_at: DateTime<Utc>)
    -> Result<String, AuthError>;

    /// Issue a token for `subject`, valid from now.
    fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        self.generate_token_at(subject, Utc::now())
    }

    /// Validate signature, issuer and expiry, and decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Source of truth for who may log in and which roles they hold.
///
/// Tokens only carry a subject; roles are looked up again on every request so
/// that a removed principal stops being authorized before its token expires.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check a username/password pair.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError>;

    /// Resolve a token subject back into a principal.
    async fn find_principal(&self, username: &str) -> Result<Option<Principal>, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Missing authorization")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Signing key error: {0}")]
    SigningKey(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
