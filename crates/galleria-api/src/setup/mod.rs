//! Application setup: database, remote store, auth backend and routes.

pub mod database;
pub mod remote;
pub mod routes;
pub mod server;

use crate::auth::HostedAuthProvider;
use crate::state::AppState;
use anyhow::{Context, Result};
use galleria_core::Config;
use galleria_db::{AlbumRepository, FileRepository, StorageMetricsRepository};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = database::setup_database(&config).await?;

    let remote = remote::setup_remote(&config)?;

    let auth = HostedAuthProvider::new(
        config.auth_url(),
        config.auth_anon_key(),
        config.auth_service_role_key(),
        Duration::from_secs(config.remote_timeout_secs()),
    )
    .context("Failed to build auth client")?;

    let state = Arc::new(AppState {
        config: config.clone(),
        files: Arc::new(FileRepository::new(pool.clone())),
        albums: Arc::new(AlbumRepository::new(pool.clone())),
        metrics: Arc::new(StorageMetricsRepository::new(pool)),
        remote,
        auth: Arc::new(auth),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
