//! Main entry point for the apiprofile backend.
//!
//! This file initializes tracing, loads configuration, opens the database,
//! wires the services and serves the Axum router.

use anyhow::{Context, Result};
use apiprofile_backend::api::{AppState, app_router};
use apiprofile_backend::config::Config;
use apiprofile_backend::database::Database;
use apiprofile_backend::repositories::{RefreshTokenRepository, UserRepository};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config)
        .await
        .context("failed to open database")?;

    let state = AppState::new(
        Arc::new(UserRepository::new(db.pool().clone())),
        Arc::new(RefreshTokenRepository::new(db.pool().clone())),
        config.auth(),
    );
    let app = app_router(state);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!("Starting apiprofile server on port {}", config.server_port);
    axum::serve(listener, app).await?;

    db.close().await;
    Ok(())
}
