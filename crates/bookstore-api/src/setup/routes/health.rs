//! Health check handler and response type.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
}

/// Database reachability and the upload root being a readable directory.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = run_check(
        CHECK_TIMEOUT,
        async {
            sqlx::query("SELECT 1")
                .execute(&state.db.pool)
                .await
                .map(|_| ())
        },
        "unhealthy",
    )
    .await;

    let storage = run_check(
        CHECK_TIMEOUT,
        async {
            match tokio::fs::metadata(state.admin.uploads.static_root()).await {
                Ok(metadata) if metadata.is_dir() => Ok(()),
                Ok(_) => Err(std::io::Error::other("static root is not a directory")),
                Err(e) => Err(e),
            }
        },
        "unhealthy",
    )
    .await;

    let healthy = database == "healthy" && storage == "healthy";
    if !healthy {
        tracing::error!(database = %database, storage = %storage, "Health check failed");
    }

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            database,
            storage,
        }),
    )
}
