//! Configuration module
//!
//! Environment-driven settings for the bookstore server: database pool, upload
//! roots and allowlists, session lifetime and optional admin seeding.

use std::env;
use std::path::PathBuf;

const PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 16;
const SESSION_TTL_HOURS: i64 = 168;
const MAX_UPLOAD_SIZE_MB_LIMIT: usize = 1024;
const SESSION_TTL_HOURS_LIMIT: i64 = 24 * 365;
const COVER_ALLOWED_EXTENSIONS: &str = "png,jpg,jpeg,gif,webp";
const DOCUMENT_ALLOWED_EXTENSIONS: &str = "pdf,epub,mobi,txt";

/// Admin identity created at startup when none exists for the email.
#[derive(Clone, Debug)]
pub struct SeedAdmin {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Settings read from the process environment.
#[derive(Clone, Debug)]
pub struct BookstoreConfig {
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub static_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub cover_allowed_extensions: Vec<String>,
    pub document_allowed_extensions: Vec<String>,
    pub session_ttl_hours: i64,
    pub seed_admin: Option<SeedAdmin>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<BookstoreConfig>);

fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl BookstoreConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let mut database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        if is_production_env(&environment) && !database_url.contains("sslmode=") {
            let separator = if database_url.contains('?') { '&' } else { '?' };
            database_url = format!("{}{}sslmode=require", database_url, separator);
        }

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let seed_admin = match (env::var("SEED_ADMIN_EMAIL"), env::var("SEED_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(SeedAdmin {
                    full_name: env::var("SEED_ADMIN_NAME")
                        .unwrap_or_else(|_| "Administrator".to_string()),
                    email: email.trim().to_lowercase(),
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| PORT.to_string())
                .parse()
                .unwrap_or(PORT),
            environment,
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            static_dir: PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string())),
            max_upload_size_bytes,
            cover_allowed_extensions: parse_extension_list(
                &env::var("COVER_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| COVER_ALLOWED_EXTENSIONS.to_string()),
            ),
            document_allowed_extensions: parse_extension_list(
                &env::var("DOCUMENT_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DOCUMENT_ALLOWED_EXTENSIONS.to_string()),
            ),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| SESSION_TTL_HOURS.to_string())
                .parse()
                .unwrap_or(SESSION_TTL_HOURS),
            seed_admin,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.cover_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "COVER_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.document_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "DOCUMENT_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.max_upload_size_bytes > MAX_UPLOAD_SIZE_MB_LIMIT * 1024 * 1024 {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_MB must be at most {}",
                MAX_UPLOAD_SIZE_MB_LIMIT
            ));
        }

        if self.session_ttl_hours <= 0 {
            return Err(anyhow::anyhow!("SESSION_TTL_HOURS must be greater than 0"));
        }

        if self.session_ttl_hours > SESSION_TTL_HOURS_LIMIT {
            return Err(anyhow::anyhow!(
                "SESSION_TTL_HOURS must be at most {}",
                SESSION_TTL_HOURS_LIMIT
            ));
        }

        if let Some(seed) = &self.seed_admin {
            if seed.password.len() < 8 {
                return Err(anyhow::anyhow!(
                    "SEED_ADMIN_PASSWORD must be at least 8 characters long"
                ));
            }
        }

        Ok(())
    }
}

impl Config {
    fn inner(&self) -> &BookstoreConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = BookstoreConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().environment)
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn static_dir(&self) -> &std::path::Path {
        &self.inner().static_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn cover_allowed_extensions(&self) -> &[String] {
        &self.inner().cover_allowed_extensions
    }

    pub fn document_allowed_extensions(&self) -> &[String] {
        &self.inner().document_allowed_extensions
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.inner().session_ttl_hours
    }

    pub fn seed_admin(&self) -> Option<&SeedAdmin> {
        self.inner().seed_admin.as_ref()
    }
}
