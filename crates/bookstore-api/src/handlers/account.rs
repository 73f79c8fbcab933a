//! Login, registration, profile and wishlist

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Redirect,
    Extension, Form, Json,
};
use bookstore_core::{
    catalog::WISHLIST_PAGE_LIMIT,
    models::{LoginForm, RegisterForm, Role, WishlistBook, WishlistToggle},
    validation::is_safe_redirect,
    AppError,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::{redirect_with, redirect_with_error, render, Page};
use crate::auth::{authenticate, end_session, establish_session, hash_password, CurrentUser};
use crate::constants::{HOME_PATH, LOGIN_PATH, PROFILE_PATH};
use crate::error::HttpAppError;
use crate::flash::{self, Flash, FlashCategory};
use crate::state::{AuthState, DbState};
use crate::utils::{referer_path, safe_target};

const REGISTER_PATH: &str = "/register";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    /// Return target echoed back into the form, when safe.
    pub next: Option<String>,
}

pub async fn login_page(
    session: Session,
    Query(query): Query<NextQuery>,
) -> Result<Json<Page<LoginPage>>, HttpAppError> {
    let next = query.next.filter(|n| is_safe_redirect(n));
    render(&session, LoginPage { next }).await
}

/// Checks credentials and starts a session on success.
///
/// The return target comes from the query string first, then the form.
pub async fn login(
    State(auth): State<AuthState>,
    session: Session,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, HttpAppError> {
    let identity = match authenticate(auth.lookup.as_ref(), &form.email, &form.password).await {
        Ok(identity) => identity,
        Err(AppError::InvalidCredentials) => {
            tracing::warn!("Failed login attempt");
            return redirect_with_error(&session, AppError::InvalidCredentials, LOGIN_PATH).await;
        }
        Err(e) => return Err(e.into()),
    };

    establish_session(&session, &identity).await?;

    let target = safe_target(
        [query.next.as_deref(), form.next.as_deref()],
        identity.role.home_path(),
    );
    Ok(Redirect::to(target))
}

pub async fn logout(session: Session) -> Result<Redirect, HttpAppError> {
    end_session(&session).await?;
    redirect_with(&session, vec![Flash::info("You’ve been logged out.")], HOME_PATH).await
}

#[derive(Debug, Serialize)]
pub struct RegisterPage {}

pub async fn register_page(session: Session) -> Result<Json<Page<RegisterPage>>, HttpAppError> {
    render(&session, RegisterPage {}).await
}

pub async fn register(
    State(auth): State<AuthState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, HttpAppError> {
    let new_user = match form.into_new_user() {
        Ok(new_user) => new_user,
        Err(e) => return redirect_with_error(&session, e, REGISTER_PATH).await,
    };

    if auth.identities.user_email_exists(&new_user.email).await? {
        return redirect_with_error(
            &session,
            AppError::Conflict("Email is already registered.".to_string()),
            REGISTER_PATH,
        )
        .await;
    }

    let password_hash = hash_password(&new_user.password)?;
    match auth
        .identities
        .create_user(&new_user.full_name, &new_user.email, &password_hash)
        .await
    {
        Ok(user_id) => {
            tracing::info!(user_id, "User registered");
            redirect_with(
                &session,
                vec![Flash::success("Account created. Please log in.")],
                LOGIN_PATH,
            )
            .await
        }
        Err(e @ AppError::Conflict(_)) => redirect_with_error(&session, e, REGISTER_PATH).await,
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub wishlist: Vec<WishlistBook>,
}

/// Wishlist of the signed-in customer, newest additions first.
///
/// Wishlists belong to customer accounts; an admin session sees an empty list.
pub async fn me(
    State(db): State<DbState>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Page<ProfilePage>>, HttpAppError> {
    let wishlist = match user.role() {
        Role::User => db.wishlists.list_for_user(user.id(), WISHLIST_PAGE_LIMIT).await?,
        Role::Admin => Vec::new(),
    };

    render(&session, ProfilePage { wishlist }).await
}

#[derive(Debug, Serialize)]
pub struct UserPage {
    pub id: i64,
    pub name: String,
}

pub async fn user_profile(
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Page<UserPage>>, HttpAppError> {
    render(
        &session,
        UserPage {
            id: user.id(),
            name: user.name().to_string(),
        },
    )
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct WishlistToggleForm {
    pub next: Option<String>,
}

pub async fn wishlist_toggle(
    State(db): State<DbState>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    Path(book_id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<WishlistToggleForm>,
) -> Result<Redirect, HttpAppError> {
    let referer = referer_path(&headers);
    let target = safe_target([form.next.as_deref(), referer.as_deref()], PROFILE_PATH).to_string();

    if user.role() != Role::User {
        return redirect_with(
            &session,
            vec![Flash::warning("Wishlists are available to customer accounts.")],
            &target,
        )
        .await;
    }

    if db.catalog.book_listing(book_id).await?.is_none() {
        return redirect_with_error(
            &session,
            AppError::NotFound("Book not found.".to_string()),
            &target,
        )
        .await;
    }

    let outcome = db.wishlists.toggle(user.id(), book_id).await?;
    let category = match outcome {
        WishlistToggle::Added => FlashCategory::Success,
        WishlistToggle::Removed => FlashCategory::Info,
    };
    flash::push(&session, Flash::new(category, outcome.message())).await?;

    Ok(Redirect::to(&target))
}
