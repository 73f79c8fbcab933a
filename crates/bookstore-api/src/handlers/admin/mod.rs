//! Admin back-office. Every route here sits behind both guards with role `admin`.

pub mod books;
pub mod taxonomy;

use axum::{
    extract::{Query, State},
    Json,
};
use bookstore_core::models::{AuthorWithCount, BookListing, CategoryWithCount};
use bookstore_db::CountOrder;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::{render, Page};
use crate::error::HttpAppError;
use crate::state::DbState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub books: Vec<BookListing>,
    pub categories: Vec<CategoryWithCount>,
    pub authors: Vec<AuthorWithCount>,
    pub search_query: String,
    pub books_count: usize,
}

pub async fn dashboard(
    State(db): State<DbState>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Page<DashboardPage>>, HttpAppError> {
    let search_query = query.q.unwrap_or_default().trim().to_string();
    let filter = (!search_query.is_empty()).then_some(search_query.as_str());

    let books = db.catalog.admin_books(filter).await?;
    let categories = db.catalog.categories_with_counts(CountOrder::ById).await?;
    let authors = db.catalog.authors_with_counts(CountOrder::ById).await?;

    render(
        &session,
        DashboardPage {
            books_count: books.len(),
            books,
            categories,
            authors,
            search_query,
        },
    )
    .await
}
