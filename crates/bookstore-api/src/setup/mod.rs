//! Application setup and initialization
//!
//! Startup order: configuration, tracing, database and migrations, upload
//! roots, admin seeding, session store, then the router.

pub mod database;
pub mod routes;
pub mod seed;
pub mod server;
pub mod sessions;

use crate::state::AppState;
use anyhow::{Context, Result};
use bookstore_core::Config;
use bookstore_infra::LogFormat;
use bookstore_storage::UploadStore;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    bookstore_infra::init_telemetry(LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let uploads = setup_uploads(&config).await?;

    seed::seed_admin(&config, &pool).await?;

    let session_store = sessions::setup_session_store(pool.clone()).await?;

    let state = Arc::new(AppState::new(config.clone(), pool, uploads));
    let router = routes::setup_routes(state.clone(), session_store);

    Ok((state, router))
}

/// Create the upload roots under the static directory.
pub async fn setup_uploads(config: &Config) -> Result<Arc<UploadStore>> {
    let store = UploadStore::new(
        config.static_dir(),
        config.cover_allowed_extensions().to_vec(),
        config.document_allowed_extensions().to_vec(),
    )
    .await
    .context("Failed to prepare upload directories")?;

    tracing::info!(
        static_root = %store.static_root().display(),
        cover_extensions = %config.cover_allowed_extensions().join(","),
        document_extensions = %config.document_allowed_extensions().join(","),
        "Upload store ready"
    );

    Ok(Arc::new(store))
}
