//! Authentication implementations.

mod credentials;
mod jwt;
mod signing_key;

pub use credentials::{Argon2PasswordService, InMemoryCredentialStore};
pub use jwt::{JwtConfig, JwtTokenService};
pub use signing_key::{SIGNING_KEY_SETTING, ensure_signing_key};
