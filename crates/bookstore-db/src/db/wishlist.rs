use bookstore_core::{
    models::{WishlistBook, WishlistToggle},
    AppError,
};
use sqlx::{PgPool, Postgres};

use super::transaction::TransactionGuard;

/// Repository for the `wishlists` join table
#[derive(Clone)]
pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove the pair if present, otherwise add it.
    #[tracing::instrument(skip(self), fields(db.table = "wishlists", db.operation = "toggle"))]
    pub async fn toggle(&self, user_id: i64, book_id: i64) -> Result<WishlistToggle, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool, "toggle_wishlist").await?;

        let removed = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(tx.conn())
            .await?
            .rows_affected();

        let outcome = if removed > 0 {
            WishlistToggle::Removed
        } else {
            sqlx::query(
                r#"
                INSERT INTO wishlists (user_id, book_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(book_id)
            .execute(tx.conn())
            .await?;
            WishlistToggle::Added
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Most recently added books first.
    #[tracing::instrument(skip(self), fields(db.table = "wishlists", db.operation = "select"))]
    pub async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<WishlistBook>, AppError> {
        let books = sqlx::query_as::<Postgres, WishlistBook>(
            r#"
            SELECT b.id, b.title, b.price, b.cover,
                   a.name AS author_name, c.name AS category_name,
                   w.created_at AS added_at
            FROM wishlists w
            JOIN books b ON b.id = w.book_id
            JOIN authors a ON a.id = b.author_id
            JOIN categories c ON c.id = b.category_id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
