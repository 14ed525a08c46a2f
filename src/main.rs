//! # entitycoll
//!
//! Serves the users, threads and messages collections over HTTP.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Storage backend (memory or SQLite)
//! - HTTP server

use anyhow::Result;
use tracing::info;

use entitycoll::config::Settings;
use entitycoll::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    entitycoll::telemetry::init_tracing();

    info!("Starting entitycoll...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        backend = ?settings.database.backend,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
