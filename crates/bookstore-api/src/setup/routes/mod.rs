//! Route configuration and setup.
//!
//! Route groups are split by the guards they sit behind. Health checks live in
//! [health](health).

mod health;

use crate::auth::{require_authenticated, require_role};
use crate::handlers::{account, admin, public};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use bookstore_core::models::Role;
use bookstore_infra::{no_cache_middleware, request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions_sqlx_store::PostgresStore;

use super::sessions::session_layer;

/// Setup all application routes. Body limit and session cookie settings come
/// from the configuration held in `state`.
pub fn setup_routes(state: Arc<AppState>, session_store: PostgresStore) -> Router {
    let config = &state.config;
    let static_files = ServeDir::new(state.admin.uploads.static_root());

    public_routes()
        .merge(account_routes())
        .merge(customer_routes())
        .merge(admin_routes())
        .route("/health", get(health::health_check))
        .nest_service("/static", static_files)
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(session_layer(config, session_store))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(no_cache_middleware))
        .with_state(state)
}

/// Public catalog and the login/register forms (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(public::index))
        .route("/store", get(public::store))
        .route("/book/{id}", get(public::book_detail))
        .route("/about", get(public::about))
        .route(
            "/contact",
            get(public::contact_page).post(public::contact_submit),
        )
        .route("/login", get(account::login_page).post(account::login))
        .route("/logout", post(account::logout))
        .route(
            "/register",
            get(account::register_page).post(account::register),
        )
}

/// Routes open to any signed-in identity
fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(account::me))
        .route(
            "/wishlist/toggle/{book_id}",
            post(account::wishlist_toggle),
        )
        .route_layer(from_fn(require_authenticated))
}

/// Routes for customer accounts only
fn customer_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(account::user_profile))
        .route_layer(from_fn_with_state(Role::User, require_role))
        .route_layer(from_fn(require_authenticated))
}

/// Back-office routes
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route(
            "/add_book",
            get(admin::books::add_book_page).post(admin::books::add_book),
        )
        .route(
            "/edit_book/{id}",
            get(admin::books::edit_book_page).post(admin::books::edit_book),
        )
        .route("/delete_book/{id}", post(admin::books::delete_book))
        .route(
            "/add_author",
            get(admin::taxonomy::add_author_page).post(admin::taxonomy::add_author),
        )
        .route(
            "/edit_author/{id}",
            get(admin::taxonomy::edit_author_page).post(admin::taxonomy::edit_author),
        )
        .route("/delete_author/{id}", post(admin::taxonomy::delete_author))
        .route(
            "/add_category",
            get(admin::taxonomy::add_category_page).post(admin::taxonomy::add_category),
        )
        .route(
            "/edit_category/{id}",
            get(admin::taxonomy::edit_category_page).post(admin::taxonomy::edit_category),
        )
        .route(
            "/delete_category/{id}",
            post(admin::taxonomy::delete_category),
        )
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(from_fn(require_authenticated))
}
