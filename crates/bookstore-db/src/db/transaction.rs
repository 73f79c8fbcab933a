//! Database transaction utilities
//!
//! Multi-statement writes (check-then-delete, toggle, insert) run inside a
//! [`TransactionGuard`]. Anything not explicitly committed is rolled back:
//! dropping the guard drops the underlying sqlx transaction, which issues the
//! rollback and returns the connection to the pool.

use bookstore_core::AppError;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// A named database transaction.
///
/// # Example
///
/// ```ignore
/// use bookstore_db::db::transaction::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), bookstore_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool, "example").await?;
///     sqlx::query("DELETE FROM wishlists").execute(tx.conn()).await?;
///     tx.commit().await
/// }
/// ```
pub struct TransactionGuard<'a> {
    transaction: Transaction<'a, Postgres>,
    operation: &'static str,
}

impl<'a> TransactionGuard<'a> {
    /// Begin a new database transaction labelled with `operation` for logs.
    pub async fn begin(pool: &'a PgPool, operation: &'static str) -> Result<Self, AppError> {
        let transaction = pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, operation, "Failed to begin database transaction");
            AppError::from(e)
        })?;

        Ok(Self {
            transaction,
            operation,
        })
    }

    /// Connection to run statements on inside this transaction.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.transaction
    }

    pub async fn commit(self) -> Result<(), AppError> {
        let operation = self.operation;
        self.transaction.commit().await.map_err(|e| {
            tracing::error!(error = %e, operation, "Failed to commit database transaction");
            AppError::from(e)
        })
    }

    pub async fn rollback(self) -> Result<(), AppError> {
        let operation = self.operation;
        tracing::debug!(operation, "Rolling back database transaction");
        self.transaction.rollback().await.map_err(AppError::from)
    }
}
