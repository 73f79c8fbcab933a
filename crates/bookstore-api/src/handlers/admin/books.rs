use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use bookstore_core::{
    models::{Author, Book, Category},
    AppError,
};
use bookstore_storage::UploadKind;
use serde::Serialize;
use tower_sessions::Session;

use crate::constants::ADMIN_PATH;
use crate::error::HttpAppError;
use crate::flash::Flash;
use crate::handlers::{redirect_with, redirect_with_error, render, Page};
use crate::services::EditOutcome;
use crate::state::AdminState;
use crate::utils::read_book_submission;

const ADD_BOOK_PATH: &str = "/add_book";

fn edit_book_path(id: i64) -> String {
    format!("/edit_book/{}", id)
}

#[derive(Debug, Serialize)]
pub struct BookFormPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub cover_extensions: Vec<String>,
    pub document_extensions: Vec<String>,
}

async fn form_page(admin: &AdminState, book: Option<Book>) -> Result<BookFormPage, AppError> {
    Ok(BookFormPage {
        book,
        authors: admin.taxonomy.list_authors().await?,
        categories: admin.taxonomy.list_categories().await?,
        cover_extensions: admin.uploads.target(UploadKind::Cover).allowed_extensions().to_vec(),
        document_extensions: admin
            .uploads
            .target(UploadKind::Document)
            .allowed_extensions()
            .to_vec(),
    })
}

pub async fn add_book_page(
    State(admin): State<AdminState>,
    session: Session,
) -> Result<Json<Page<BookFormPage>>, HttpAppError> {
    let page = form_page(&admin, None).await?;
    render(&session, page).await
}

pub async fn add_book(
    State(admin): State<AdminState>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect, HttpAppError> {
    let created = match read_book_submission(multipart).await {
        Ok(submission) => admin.books.create(submission).await,
        Err(e) => Err(e),
    };

    match created {
        Ok(book) => {
            redirect_with(
                &session,
                vec![Flash::success(format!("Book '{}' added successfully!", book.title))],
                ADD_BOOK_PATH,
            )
            .await
        }
        Err(e) => redirect_with_error(&session, e, ADD_BOOK_PATH).await,
    }
}

pub async fn edit_book_page(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, HttpAppError> {
    let book = match admin.books.get(id).await {
        Ok(book) => book,
        Err(e @ AppError::NotFound(_)) => {
            return Ok(redirect_with_error(&session, e, ADMIN_PATH).await?.into_response())
        }
        Err(e) => return Err(e.into()),
    };
    let page = form_page(&admin, Some(book)).await?;
    Ok(render(&session, page).await?.into_response())
}

pub async fn edit_book(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Redirect, HttpAppError> {
    let mut notices = Vec::new();
    let result = match read_book_submission(multipart).await {
        Ok(submission) => admin.books.update(id, submission, &mut notices).await,
        Err(e) => Err(e),
    };

    let back = edit_book_path(id);
    match result {
        Ok(EditOutcome::Unchanged) => {
            notices.push(Flash::info("No changes were made."));
            redirect_with(&session, notices, &back).await
        }
        Ok(EditOutcome::Updated(_)) => {
            notices.push(Flash::success("Book updated successfully."));
            redirect_with(&session, notices, &back).await
        }
        Err(e @ AppError::NotFound(_)) => redirect_with_error(&session, e, ADMIN_PATH).await,
        Err(e) => {
            notices.push(Flash::from_error(&e));
            redirect_with(&session, notices, &back).await
        }
    }
}

pub async fn delete_book(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Redirect, HttpAppError> {
    match admin.books.delete(id).await {
        Ok(_) => {
            redirect_with(
                &session,
                vec![Flash::success("Book deleted successfully.")],
                ADMIN_PATH,
            )
            .await
        }
        Err(e) => redirect_with_error(&session, e, ADMIN_PATH).await,
    }
}
