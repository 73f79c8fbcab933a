use bookstore_core::{
    models::{Book, BookDraft, BookUpdate},
    AppError,
};
use sqlx::{PgPool, Postgres};

use super::transaction::TransactionGuard;

const BOOK_COLUMNS: &str =
    "id, title, author_id, category_id, description, price, cover, file, date_added";

/// Repository for the `books` table
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: i64) -> Result<Option<Book>, AppError> {
        let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let book = sqlx::query_as::<Postgres, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Whether both referenced rows exist.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select"))]
    pub async fn author_and_category_exist(
        &self,
        author_id: i64,
        category_id: i64,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)
               AND EXISTS(SELECT 1 FROM categories WHERE id = $2)
            "#,
        )
        .bind(author_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Another book with the same title (ignoring case) and author.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select"))]
    pub async fn title_taken_by_other(
        &self,
        title: &str,
        author_id: i64,
        exclude_id: i64,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM books
                WHERE LOWER(title) = LOWER($1) AND author_id = $2 AND id <> $3
            )
            "#,
        )
        .bind(title)
        .bind(author_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a book row inside its own transaction.
    #[tracing::instrument(skip(self, draft), fields(db.table = "books", db.operation = "insert"))]
    pub async fn insert(&self, draft: &BookDraft, cover: &str, file: &str) -> Result<Book, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool, "insert_book").await?;

        let sql = format!(
            r#"
            INSERT INTO books (title, author_id, description, category_id, price, cover, file)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<Postgres, Book>(&sql)
            .bind(&draft.title)
            .bind(draft.author_id)
            .bind(&draft.description)
            .bind(draft.category_id)
            .bind(draft.price)
            .bind(cover)
            .bind(file)
            .fetch_one(tx.conn())
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "books", db.operation = "update", db.record_id = %id))]
    pub async fn update(&self, id: i64, update: &BookUpdate) -> Result<Book, AppError> {
        let sql = format!(
            r#"
            UPDATE books
            SET title = $1, description = $2, author_id = $3, category_id = $4,
                price = $5, cover = $6, file = $7
            WHERE id = $8
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<Postgres, Book>(&sql)
            .bind(&update.draft.title)
            .bind(&update.draft.description)
            .bind(update.draft.author_id)
            .bind(update.draft.category_id)
            .bind(update.draft.price)
            .bind(&update.cover)
            .bind(&update.file)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        book.ok_or_else(|| AppError::NotFound("Book not found.".to_string()))
    }

    /// Delete a book row. Rows still referenced elsewhere are refused.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from);

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) if e.is_foreign_key_violation() => Err(AppError::ReferentialIntegrity(
                "Cannot delete this book because it's referenced elsewhere (inventory/sales)."
                    .to_string(),
            )),
            Err(e) => Err(e),
        }
    }
}
