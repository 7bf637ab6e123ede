//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::Context;

use wordless_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub seed_demo_content: bool,
}

/// Admin credential, token and cookie settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub jwt: JwtConfig,
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            jwt: JwtConfig::default(),
            cookie_secure: false,
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(default)
}

/// Whether `RUST_ENV` names a production deployment.
pub fn is_production() -> bool {
    env::var("RUST_ENV")
        .map(|v| v == "production" || v == "prod")
        .unwrap_or(false)
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username);
        let admin_password = match env::var("ADMIN_PASSWORD") {
            Ok(password) => password,
            Err(_) => {
                if is_production() {
                    tracing::error!(
                        "SECURITY: Using default admin password in production! Set ADMIN_PASSWORD."
                    );
                } else {
                    tracing::warn!("Using default admin password. Set ADMIN_PASSWORD for real use.");
                }
                defaults.admin_password
            }
        };

        Self {
            admin_username,
            admin_password,
            jwt: JwtConfig {
                issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
                expiration_days: parsed("JWT_EXPIRATION_DAYS", defaults.jwt.expiration_days),
            },
            cookie_secure: flag("COOKIE_SECURE", defaults.cookie_secure),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let mut database = DatabaseConfig::new(url);
        database.max_connections = parsed("DB_MAX_CONNECTIONS", database.max_connections);
        database.min_connections = parsed("DB_MIN_CONNECTIONS", database.min_connections);

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            auth: AuthConfig::from_env(),
            seed_demo_content: flag("SEED_DEMO_CONTENT", true),
        })
    }
}
