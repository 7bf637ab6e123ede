//! # Wordless API Server
//!
//! Actix-web HTTP layer over the Wordless blog: routes, JWT cookie
//! authentication, error rendering and application wiring.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

pub use config::{AppConfig, AuthConfig};
pub use handlers::configure_routes;
pub use middleware::auth::JwtAuthentication;
pub use observability::RequestIdMiddleware;
pub use state::AppState;
