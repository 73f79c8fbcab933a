use bookstore_core::{models::Author, AppError};
use sqlx::{PgPool, Postgres};

use super::transaction::TransactionGuard;
use super::DeleteOutcome;

/// Repository for the `authors` table
#[derive(Clone)]
pub struct AuthorRepository {
    pool: PgPool,
}

impl AuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Author>, AppError> {
        let authors = sqlx::query_as::<Postgres, Author>(
            "SELECT id, name FROM authors ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: i64) -> Result<Option<Author>, AppError> {
        let author =
            sqlx::query_as::<Postgres, Author>("SELECT id, name FROM authors WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(author)
    }

    /// Case-insensitive name lookup, optionally ignoring one row.
    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "select"))]
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM authors
                WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "insert"))]
    pub async fn create(&self, name: &str) -> Result<Author, AppError> {
        let result = sqlx::query_as::<Postgres, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from);

        match result {
            Err(e) if e.is_unique_violation() => Err(AppError::Conflict(format!(
                "Author '{}' already exists.",
                name
            ))),
            other => other,
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "update", db.record_id = %id))]
    pub async fn rename(&self, id: i64, name: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE authors SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from);

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(AppError::NotFound("Author not found.".to_string()))
            }
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => {
                Err(AppError::Conflict("Author already exists.".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the author only if no book references it.
    ///
    /// The row is locked while books are counted, so a book cannot reference it
    /// between the check and the delete.
    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_unreferenced(&self, id: i64) -> Result<DeleteOutcome, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool, "delete_author").await?;

        let name = sqlx::query_scalar::<Postgres, String>(
            "SELECT name FROM authors WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.conn())
        .await?;

        let Some(name) = name else {
            tx.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        };

        let book_count =
            sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM books WHERE author_id = $1")
                .bind(id)
                .fetch_one(tx.conn())
                .await?;

        if book_count > 0 {
            tx.rollback().await?;
            return Ok(DeleteOutcome::Blocked { name, book_count });
        }

        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(tx.conn())
            .await?;

        tx.commit().await?;
        Ok(DeleteOutcome::Deleted { name })
    }
}
