//! Author and category forms

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use bookstore_core::{
    models::{Author, AuthorForm, Category, CategoryForm},
    AppError,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::constants::ADMIN_PATH;
use crate::error::HttpAppError;
use crate::flash::Flash;
use crate::handlers::{redirect_with, redirect_with_error, render, Page};
use crate::services::RenameOutcome;
use crate::state::AdminState;

const ADD_AUTHOR_PATH: &str = "/add_author";
const ADD_CATEGORY_PATH: &str = "/add_category";

/// Rename form shared by the edit pages.
#[derive(Debug, Default, Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct EmptyForm {}

pub async fn add_author_page(session: Session) -> Result<Json<Page<EmptyForm>>, HttpAppError> {
    render(&session, EmptyForm {}).await
}

pub async fn add_author(
    State(admin): State<AdminState>,
    session: Session,
    Form(form): Form<AuthorForm>,
) -> Result<Redirect, HttpAppError> {
    match admin.taxonomy.add_author(&form.author_name).await {
        Ok(author) => {
            redirect_with(
                &session,
                vec![Flash::success(format!("Author '{}' added successfully!", author.name))],
                ADD_AUTHOR_PATH,
            )
            .await
        }
        Err(e) => redirect_with_error(&session, e, ADD_AUTHOR_PATH).await,
    }
}

pub async fn add_category_page(session: Session) -> Result<Json<Page<EmptyForm>>, HttpAppError> {
    render(&session, EmptyForm {}).await
}

pub async fn add_category(
    State(admin): State<AdminState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect, HttpAppError> {
    match admin.taxonomy.add_category(&form.category_name).await {
        Ok(category) => {
            redirect_with(
                &session,
                vec![Flash::success(format!(
                    "Category '{}' added successfully!",
                    category.name
                ))],
                ADD_CATEGORY_PATH,
            )
            .await
        }
        Err(e) => redirect_with_error(&session, e, ADD_CATEGORY_PATH).await,
    }
}

#[derive(Debug, Serialize)]
pub struct EditAuthorPage {
    pub author: Author,
}

pub async fn edit_author_page(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, HttpAppError> {
    match admin.taxonomy.get_author(id).await {
        Ok(author) => Ok(render(&session, EditAuthorPage { author }).await?.into_response()),
        Err(e @ AppError::NotFound(_)) => {
            Ok(redirect_with_error(&session, e, ADMIN_PATH).await?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Where a rename outcome lands: back on the form, or the dashboard when the row is gone.
async fn finish_rename(
    session: &Session,
    result: Result<RenameOutcome, AppError>,
    back: &str,
    success: &str,
) -> Result<Redirect, HttpAppError> {
    match result {
        Ok(RenameOutcome::Unchanged) => {
            redirect_with(session, vec![Flash::info("No changes were made.")], back).await
        }
        Ok(RenameOutcome::Renamed) => {
            redirect_with(session, vec![Flash::success(success)], back).await
        }
        Err(e @ AppError::NotFound(_)) => redirect_with_error(session, e, ADMIN_PATH).await,
        Err(e) => redirect_with_error(session, e, back).await,
    }
}

pub async fn edit_author(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<RenameForm>,
) -> Result<Redirect, HttpAppError> {
    let result = admin.taxonomy.rename_author(id, &form.name).await;
    finish_rename(
        &session,
        result,
        &format!("/edit_author/{}", id),
        "Author updated successfully.",
    )
    .await
}

#[derive(Debug, Serialize)]
pub struct EditCategoryPage {
    pub category: Category,
}

pub async fn edit_category_page(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, HttpAppError> {
    match admin.taxonomy.get_category(id).await {
        Ok(category) => Ok(render(&session, EditCategoryPage { category })
            .await?
            .into_response()),
        Err(e @ AppError::NotFound(_)) => {
            Ok(redirect_with_error(&session, e, ADMIN_PATH).await?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_category(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<RenameForm>,
) -> Result<Redirect, HttpAppError> {
    let result = admin.taxonomy.rename_category(id, &form.name).await;
    finish_rename(
        &session,
        result,
        &format!("/edit_category/{}", id),
        "Category updated successfully.",
    )
    .await
}

pub async fn delete_author(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Redirect, HttpAppError> {
    match admin.taxonomy.delete_author(id).await {
        Ok(_) => redirect_with(&session, vec![Flash::success("Author deleted.")], ADMIN_PATH).await,
        Err(e) => redirect_with_error(&session, e, ADMIN_PATH).await,
    }
}

pub async fn delete_category(
    State(admin): State<AdminState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Redirect, HttpAppError> {
    match admin.taxonomy.delete_category(id).await {
        Ok(name) => {
            redirect_with(
                &session,
                vec![Flash::success(format!("Category '{}' deleted.", name))],
                ADMIN_PATH,
            )
            .await
        }
        Err(e) => redirect_with_error(&session, e, ADMIN_PATH).await,
    }
}
