//! Public catalog pages and the contact form

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::Redirect,
    Form, Json,
};
use bookstore_core::{
    catalog::{HOME_FEATURED_COUNT, HOME_NEW_BOOKS_LIMIT, RELATED_BOOKS_LIMIT},
    models::{BookListing, CategoryWithCount, ContactForm},
    AppError, CatalogCounts, ErrorMetadata, Pagination, StoreParams, StoreQuery,
};
use bookstore_db::CountOrder;
use serde::Serialize;
use tower_sessions::Session;

use super::{current_year, redirect_with, render, Page};
use crate::error::HttpAppError;
use crate::flash::Flash;
use crate::state::DbState;
use crate::utils::ClientIp;

const CONTACT_PATH: &str = "/contact";

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub new_books: Vec<BookListing>,
    pub featured: Vec<BookListing>,
    pub categories: Vec<CategoryWithCount>,
    pub counts: CatalogCounts,
    pub current_year: i32,
}

pub async fn index(
    State(db): State<DbState>,
    session: Session,
) -> Result<Json<Page<IndexPage>>, HttpAppError> {
    let new_books = db.catalog.newest_books(HOME_NEW_BOOKS_LIMIT).await?;
    let featured = new_books.iter().take(HOME_FEATURED_COUNT).cloned().collect();
    let categories = db.catalog.categories_with_counts(CountOrder::ByName).await?;
    let counts = db.catalog.counts().await?;

    render(
        &session,
        IndexPage {
            new_books,
            featured,
            categories,
            counts,
            current_year: current_year(),
        },
    )
    .await
}

#[derive(Debug, Serialize)]
pub struct StorePageModel {
    pub books: Vec<BookListing>,
    pub pagination: Pagination,
    pub query: StoreQuery,
    pub categories: Vec<CategoryWithCount>,
}

pub async fn store(
    State(db): State<DbState>,
    session: Session,
    Query(params): Query<StoreParams>,
) -> Result<Json<Page<StorePageModel>>, HttpAppError> {
    let mut query = StoreQuery::from(params);
    let page = db.catalog.store_page(&query).await?;
    // Echo the page actually served after clamping.
    query.page = page.pagination.page;
    let categories = db.catalog.categories_with_counts(CountOrder::ByName).await?;

    render(
        &session,
        StorePageModel {
            books: page.books,
            pagination: page.pagination,
            query,
            categories,
        },
    )
    .await
}

#[derive(Debug, Serialize)]
pub struct BookPage {
    pub book: BookListing,
    pub related: Vec<BookListing>,
}

pub async fn book_detail(
    State(db): State<DbState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<Page<BookPage>>, HttpAppError> {
    let book = db
        .catalog
        .book_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;
    let related = db
        .catalog
        .related_books(book.category_id, book.id, RELATED_BOOKS_LIMIT)
        .await?;

    render(&session, BookPage { book, related }).await
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub counts: CatalogCounts,
    pub current_year: i32,
}

pub async fn about(
    State(db): State<DbState>,
    session: Session,
) -> Result<Json<Page<AboutPage>>, HttpAppError> {
    let counts = db.catalog.counts().await?;
    render(
        &session,
        AboutPage {
            counts,
            current_year: current_year(),
        },
    )
    .await
}

#[derive(Debug, Serialize)]
pub struct ContactPage {
    pub current_year: i32,
}

pub async fn contact_page(session: Session) -> Result<Json<Page<ContactPage>>, HttpAppError> {
    render(
        &session,
        ContactPage {
            current_year: current_year(),
        },
    )
    .await
}

pub async fn contact_submit(
    State(db): State<DbState>,
    session: Session,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Result<Redirect, HttpAppError> {
    if form.is_spam() {
        tracing::info!(ip = ?ip, "Contact honeypot triggered");
        return redirect_with(&session, vec![Flash::success("Thanks!")], CONTACT_PATH).await;
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let message = match form.into_message(ip, user_agent) {
        Ok(message) => message,
        Err(e) => {
            return redirect_with(
                &session,
                vec![Flash::warning(e.client_message())],
                CONTACT_PATH,
            )
            .await
        }
    };

    let id = db.contacts.insert(&message).await?;
    tracing::info!(message_id = id, "Contact message stored");

    redirect_with(
        &session,
        vec![Flash::success("Message sent! We'll get back to you soon.")],
        CONTACT_PATH,
    )
    .await
}
