//! Credential store holding the single configured administrator.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;

use wordless_core::ports::{AuthError, CredentialStore, PasswordService, Principal, Role};

/// Argon2id password hashing with the crate's default parameters.
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// One admin account, configured at startup.
///
/// The plain password is hashed once on construction and dropped.
pub struct InMemoryCredentialStore {
    username: String,
    password_hash: String,
    hasher: Argon2PasswordService,
}

impl InMemoryCredentialStore {
    pub fn with_admin(username: impl Into<String>, password: &str) -> Result<Self, AuthError> {
        let hasher = Argon2PasswordService::default();
        let password_hash = hasher.hash(password)?;

        Ok(Self {
            username: username.into(),
            password_hash,
            hasher,
        })
    }

    fn admin(&self) -> Principal {
        Principal {
            username: self.username.clone(),
            roles: vec![Role::Admin],
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        // Hash check runs even for unknown names so timing does not leak them.
        let password_ok = self.hasher.verify(password, &self.password_hash)?;

        if username != self.username || !password_ok {
            tracing::debug!(username, "Rejected login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.admin())
    }

    async fn find_principal(&self, username: &str) -> Result<Option<Principal>, AuthError> {
        Ok((username == self.username).then(|| self.admin()))
    }
}
