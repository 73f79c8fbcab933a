use bookstore_core::{models::IdentityRecord, AppError};
use sqlx::{PgPool, Postgres};

/// Repository over the two identity tables, `admins` and `users`.
///
/// The tables are independent: the same email may exist in both. Precedence
/// between them is decided by the login service, not here.
#[derive(Clone)]
pub struct IdentityRepository {
    pool: PgPool,
}

impl IdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "admins", db.operation = "select"))]
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, IdentityRecord>(
            "SELECT id, full_name, email, password_hash FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, IdentityRecord>(
            "SELECT id, full_name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn user_email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a user. A concurrent registration of the same email is a conflict.
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, AppError> {
        let result = sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO users (full_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from);

        match result {
            Err(e) if e.is_unique_violation() => Err(AppError::Conflict(
                "Email is already registered.".to_string(),
            )),
            other => other,
        }
    }

    /// Insert an admin unless one with the same email exists. Returns whether a row was added.
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "admins", db.operation = "insert"))]
    pub async fn ensure_admin(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO admins (full_name, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }
}
