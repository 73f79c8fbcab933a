use bookstore_core::{
    catalog::STORE_PER_PAGE,
    models::{AuthorWithCount, BookListing, CategoryWithCount},
    AppError, CatalogCounts, Pagination, StoreQuery,
};
use sqlx::{PgPool, Postgres};

/// Columns of [`BookListing`] over `books b JOIN authors a JOIN categories c`.
const LISTING_COLUMNS: &str = r#"
    b.id, b.title, b.description, b.price, b.cover, b.file, b.date_added,
    a.id AS author_id, a.name AS author_name,
    c.id AS category_id, c.name AS category_name
"#;

const LISTING_FROM: &str = r#"
    FROM books b
    JOIN authors a ON a.id = b.author_id
    JOIN categories c ON c.id = b.category_id
"#;

/// Order of rows in count listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOrder {
    ByName,
    ById,
}

impl CountOrder {
    fn clause(&self, alias: &str) -> String {
        match self {
            CountOrder::ByName => format!("{}.name ASC", alias),
            CountOrder::ById => format!("{}.id ASC", alias),
        }
    }
}

/// One page of store results.
#[derive(Debug, Clone)]
pub struct StorePage {
    pub books: Vec<BookListing>,
    pub pagination: Pagination,
}

/// Read-only queries behind the public pages and the admin dashboard.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "count"))]
    pub async fn counts(&self) -> Result<CatalogCounts, AppError> {
        let (books, authors, categories) = sqlx::query_as::<Postgres, (i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books),
                (SELECT COUNT(*) FROM authors),
                (SELECT COUNT(*) FROM categories)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogCounts {
            books,
            authors,
            categories,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    pub async fn categories_with_counts(
        &self,
        order: CountOrder,
    ) -> Result<Vec<CategoryWithCount>, AppError> {
        let sql = format!(
            r#"
            SELECT c.id, c.name, COUNT(b.id) AS book_count
            FROM categories c
            LEFT JOIN books b ON b.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY {}
            "#,
            order.clause("c")
        );

        sqlx::query_as::<Postgres, CategoryWithCount>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    #[tracing::instrument(skip(self), fields(db.table = "authors", db.operation = "select"))]
    pub async fn authors_with_counts(
        &self,
        order: CountOrder,
    ) -> Result<Vec<AuthorWithCount>, AppError> {
        let sql = format!(
            r#"
            SELECT a.id, a.name, COUNT(b.id) AS book_count
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name
            ORDER BY {}
            "#,
            order.clause("a")
        );

        sqlx::query_as::<Postgres, AuthorWithCount>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Newest books first.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select"))]
    pub async fn newest_books(&self, limit: i64) -> Result<Vec<BookListing>, AppError> {
        let sql = format!(
            "SELECT {} {} ORDER BY b.id DESC LIMIT $1",
            LISTING_COLUMNS, LISTING_FROM
        );

        sqlx::query_as::<Postgres, BookListing>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select", db.record_id = %id))]
    pub async fn book_listing(&self, id: i64) -> Result<Option<BookListing>, AppError> {
        let sql = format!("SELECT {} {} WHERE b.id = $1", LISTING_COLUMNS, LISTING_FROM);

        sqlx::query_as::<Postgres, BookListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Other books of the same category, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select"))]
    pub async fn related_books(
        &self,
        category_id: i64,
        exclude_id: i64,
        limit: i64,
    ) -> Result<Vec<BookListing>, AppError> {
        let sql = format!(
            "SELECT {} {} WHERE b.category_id = $1 AND b.id <> $2 ORDER BY b.id DESC LIMIT $3",
            LISTING_COLUMNS, LISTING_FROM
        );

        sqlx::query_as::<Postgres, BookListing>(&sql)
            .bind(category_id)
            .bind(exclude_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Filtered, sorted and paginated store listing.
    ///
    /// The total is counted first so an out-of-range page is clamped to the last one.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select"))]
    pub async fn store_page(&self, query: &StoreQuery) -> Result<StorePage, AppError> {
        let mut conditions = Vec::new();
        let mut param_count = 1;

        if query.q.is_some() {
            conditions.push(format!(
                "AND (b.title ILIKE ${} OR a.name ILIKE ${} OR c.name ILIKE ${})",
                param_count, param_count, param_count
            ));
            param_count += 1;
        }

        if query.category_id.is_some() {
            conditions.push(format!("AND b.category_id = ${}", param_count));
            param_count += 1;
        }

        let mut filter = String::from(" WHERE 1=1");
        for condition in &conditions {
            filter.push_str(&format!(" {}", condition));
        }

        let pattern = query.q.as_ref().map(|q| format!("%{}%", escape_like(q)));

        let count_sql = format!("SELECT COUNT(*) {}{}", LISTING_FROM, filter);
        let mut count_query = sqlx::query_scalar::<Postgres, i64>(&count_sql);
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern);
        }
        if let Some(category_id) = query.category_id {
            count_query = count_query.bind(category_id);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let pagination = Pagination::new(query.page, STORE_PER_PAGE, total);

        let mut sql = format!("SELECT {} {}{}", LISTING_COLUMNS, LISTING_FROM, filter);
        // Sort keys resolve to fixed clauses; the id tiebreak keeps pages stable.
        sql.push_str(&format!(
            " ORDER BY {}, b.id DESC",
            query.sort.order_by_clause()
        ));
        sql.push_str(&format!(" LIMIT ${}", param_count));
        param_count += 1;
        sql.push_str(&format!(" OFFSET ${}", param_count));

        let mut query_builder = sqlx::query_as::<Postgres, BookListing>(&sql);

        // Bind parameters in the same order they were added
        if let Some(pattern) = &pattern {
            query_builder = query_builder.bind(pattern);
        }
        if let Some(category_id) = query.category_id {
            query_builder = query_builder.bind(category_id);
        }
        query_builder = query_builder.bind(pagination.per_page);
        query_builder = query_builder.bind(pagination.offset());

        let books = query_builder.fetch_all(&self.pool).await?;

        Ok(StorePage { books, pagination })
    }

    /// Admin dashboard book list, optionally filtered by title, author or category.
    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select"))]
    pub async fn admin_books(&self, q: Option<&str>) -> Result<Vec<BookListing>, AppError> {
        match q {
            Some(q) => {
                let sql = format!(
                    "SELECT {} {} WHERE b.title ILIKE $1 OR a.name ILIKE $1 OR c.name ILIKE $1 ORDER BY b.id",
                    LISTING_COLUMNS, LISTING_FROM
                );
                sqlx::query_as::<Postgres, BookListing>(&sql)
                    .bind(format!("%{}%", escape_like(q)))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::from)
            }
            None => {
                let sql = format!("SELECT {} {} ORDER BY b.id", LISTING_COLUMNS, LISTING_FROM);
                sqlx::query_as::<Postgres, BookListing>(&sql)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::from)
            }
        }
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside an ILIKE pattern.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_count_order_clause() {
        assert_eq!(CountOrder::ByName.clause("c"), "c.name ASC");
        assert_eq!(CountOrder::ById.clause("a"), "a.id ASC");
    }
}
