//! Optional admin seeding from configuration.

use anyhow::{Context, Result};
use bookstore_core::{models::normalize_email, Config};
use bookstore_db::IdentityRepository;
use sqlx::PgPool;

use crate::auth::hash_password;

/// Create the configured admin unless one with that email exists.
pub async fn seed_admin(config: &Config, pool: &PgPool) -> Result<()> {
    let Some(seed) = config.seed_admin() else {
        return Ok(());
    };

    let email = normalize_email(&seed.email);
    let password_hash = hash_password(&seed.password).context("Failed to hash seed admin password")?;

    let created = IdentityRepository::new(pool.clone())
        .ensure_admin(seed.full_name.trim(), &email, &password_hash)
        .await
        .context("Failed to seed admin")?;

    if created {
        tracing::info!(email = %email, "Seeded admin account");
    } else {
        tracing::debug!(email = %email, "Admin account already present, seeding skipped");
    }

    Ok(())
}
