//! Request handlers
//!
//! Page handlers answer with a JSON page model wrapped in [`Page`]. Form posts
//! answer with a `303 See Other`, carrying their outcome as flash messages.

pub mod account;
pub mod admin;
pub mod public;

use axum::{response::Redirect, Json};
use bookstore_core::{models::AuthenticatedIdentity, AppError};
use serde::Serialize;
use tower_sessions::Session;

use crate::auth::current_identity;
use crate::error::HttpAppError;
use crate::flash::{self, Flash};

/// A page model plus what every page shows: the visitor and pending messages.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub body: T,
    pub viewer: Option<AuthenticatedIdentity>,
    pub flashes: Vec<Flash>,
}

/// Wrap `body` into a [`Page`], consuming the pending flash messages.
pub async fn render<T: Serialize>(session: &Session, body: T) -> Result<Json<Page<T>>, HttpAppError> {
    let viewer = current_identity(session).await?;
    let flashes = flash::take(session).await?;
    Ok(Json(Page {
        body,
        viewer,
        flashes,
    }))
}

/// Queue `flashes` and redirect to `to`.
pub async fn redirect_with(
    session: &Session,
    flashes: Vec<Flash>,
    to: &str,
) -> Result<Redirect, HttpAppError> {
    flash::push_all(session, flashes).await?;
    Ok(Redirect::to(to))
}

/// Turn a recovered error into a flash message and redirect to `to`.
pub async fn redirect_with_error(
    session: &Session,
    error: AppError,
    to: &str,
) -> Result<Redirect, HttpAppError> {
    redirect_with(session, vec![Flash::from_error(&error)], to).await
}

/// Current calendar year for page footers.
pub fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}
