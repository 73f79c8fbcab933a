//! Server-side session storage and the session cookie.

use anyhow::{Context, Result};
use bookstore_core::Config;
use sqlx::PgPool;
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, SessionManagerLayer, SessionStore,
};
use tower_sessions_sqlx_store::PostgresStore;

use crate::constants::SESSION_COOKIE_NAME;

/// Postgres-backed session store, with its table created if missing.
pub async fn setup_session_store(pool: PgPool) -> Result<PostgresStore> {
    let store = PostgresStore::new(pool);
    store
        .migrate()
        .await
        .context("Failed to create session table")?;

    tracing::info!("Session store ready");
    Ok(store)
}

/// Session cookie: HTTP-only, `SameSite=Lax`, `Secure` in production and
/// expiring after a period of inactivity.
pub fn session_layer<Store>(config: &Config, store: Store) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.is_production())
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            config.session_ttl_hours(),
        )))
}
