//! # Wordless API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use api_server::telemetry::{TelemetryConfig, init_telemetry};
use api_server::{AppConfig, AppState, JwtAuthentication, RequestIdMiddleware, configure_routes};
use migration::{Migrator, MigratorTrait};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry);

    let config = AppConfig::from_env()?;

    tracing::info!(
        service = %telemetry.service_name,
        "Starting Wordless API Server on {}:{}",
        config.host,
        config.port
    );

    let db = wordless_infra::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to apply migrations")?;

    let state = AppState::init(db, &config.auth)
        .await
        .context("Failed to initialize authentication")?;

    if config.seed_demo_content {
        state
            .seeder()
            .seed()
            .await
            .context("Failed to seed demo content")?;
    }

    HttpServer::new(move || {
        App::new()
            .wrap(JwtAuthentication::new(&state))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
