//! Token signing key persisted in the settings table.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use wordless_core::ports::{AuthError, SettingsRepository};

/// Settings key under which the base64 signing secret is stored.
pub const SIGNING_KEY_SETTING: &str = "jwt_secret";

const SIGNING_KEY_BYTES: usize = 64;

/// Load the signing key, generating and storing one on first boot.
///
/// Concurrent first boots race on the insert; whichever wins, every
/// instance reads back the same stored key.
pub async fn ensure_signing_key(settings: &dyn SettingsRepository) -> Result<Vec<u8>, AuthError> {
    let mut fresh = [0u8; SIGNING_KEY_BYTES];
    OsRng.fill_bytes(&mut fresh);
    let encoded = STANDARD.encode(fresh);

    let inserted = settings
        .insert_if_absent(SIGNING_KEY_SETTING, Some(&encoded))
        .await
        .map_err(|e| AuthError::SigningKey(e.to_string()))?;
    if inserted {
        tracing::info!("Generated new token signing key");
    }

    let stored = settings
        .get(SIGNING_KEY_SETTING)
        .await
        .map_err(|e| AuthError::SigningKey(e.to_string()))?
        .ok_or_else(|| AuthError::SigningKey(format!("setting {SIGNING_KEY_SETTING} is empty")))?;

    let key = STANDARD
        .decode(stored.trim())
        .map_err(|e| AuthError::SigningKey(e.to_string()))?;
    if key.is_empty() {
        return Err(AuthError::SigningKey("stored key is empty".to_string()));
    }

    Ok(key)
}
