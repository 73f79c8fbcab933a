use bookstore_core::{models::NewContactMessage, AppError};
use sqlx::{PgPool, Postgres};

/// Repository for the `contact_messages` table
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, message), fields(db.table = "contact_messages", db.operation = "insert"))]
    pub async fn insert(&self, message: &NewContactMessage) -> Result<i64, AppError> {
        // Unparseable client addresses are stored as NULL rather than failing the insert.
        let ip = message
            .ip
            .as_deref()
            .filter(|ip| ip.parse::<std::net::IpAddr>().is_ok());

        let id = sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, want_copy, ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, CAST($6 AS INET), $7)
            RETURNING id
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.want_copy)
        .bind(ip)
        .bind(&message.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
