//! Route guards
//!
//! Two independent checks wrap protected routes as middleware:
//! [`require_authenticated`] (any role) and [`require_role`] (one specific role).
//! Both must pass before the handler runs. A failing guard answers with a
//! `303 See Other` to the login page and never calls the inner service.
//!
//! ```ignore
//! Router::new()
//!     .route("/admin", get(dashboard))
//!     .route_layer(from_fn_with_state(Role::Admin, require_role))
//!     .route_layer(from_fn(require_authenticated))
//! ```

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use bookstore_core::models::Role;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tower_sessions::Session;

use super::session::{current_identity, CurrentUser};
use crate::constants::LOGIN_PATH;
use crate::error::HttpAppError;

/// Login URL that brings the visitor back to `request` afterwards.
///
/// Only safe requests carry a return target; a form post cannot be replayed by a redirect.
fn login_redirect(request: &Request) -> Response {
    if request.method() != Method::GET {
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = format!(
        "{}?next={}",
        LOGIN_PATH,
        utf8_percent_encode(target, NON_ALPHANUMERIC)
    );
    Redirect::to(&location).into_response()
}

/// Requires a session holding both a subject id and a role.
///
/// On success the identity is attached to the request as [`CurrentUser`].
pub async fn require_authenticated(session: Session, mut request: Request, next: Next) -> Response {
    match current_identity(&session).await {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(CurrentUser(identity));
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!(path = %request.uri().path(), "Anonymous request to protected route");
            login_redirect(&request)
        }
        Err(e) => HttpAppError::from(e).into_response(),
    }
}

/// Requires the session role to equal the role given as middleware state.
pub async fn require_role(
    State(required): State<Role>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let role = match request.extensions().get::<CurrentUser>() {
        Some(user) => Some(user.role()),
        None => match current_identity(&session).await {
            Ok(identity) => identity.map(|i| i.role),
            Err(e) => return HttpAppError::from(e).into_response(),
        },
    };

    if role == Some(required) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        required = %required,
        actual = ?role,
        "Role check failed"
    );
    Redirect::to(LOGIN_PATH).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::establish_session;
    use axum::{
        extract::Path,
        http::{header, StatusCode},
        middleware::{from_fn, from_fn_with_state},
        routing::{get, post},
        Router,
    };
    use axum_test::TestServer;
    use bookstore_core::models::AuthenticatedIdentity;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    async fn sign_in(session: Session, Path(role): Path<String>) -> StatusCode {
        let role: Role = role.parse().unwrap();
        let identity = AuthenticatedIdentity {
            id: 5,
            role,
            name: "Tester".to_string(),
        };
        establish_session(&session, &identity).await.unwrap();
        StatusCode::NO_CONTENT
    }

    fn guarded_app(ran: Arc<AtomicBool>) -> Router {
        let admin_only = Router::new()
            .route(
                "/admin",
                get(move || {
                    let ran = ran.clone();
                    async move {
                        ran.store(true, Ordering::SeqCst);
                        "dashboard"
                    }
                }),
            )
            .route_layer(from_fn_with_state(Role::Admin, require_role))
            .route_layer(from_fn(require_authenticated));

        Router::new()
            .route("/test-login/{role}", post(sign_in))
            .merge(admin_only)
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
    }

    #[tokio::test]
    async fn test_anonymous_is_redirected_with_return_target() {
        let ran = Arc::new(AtomicBool::new(false));
        let server = TestServer::new(guarded_app(ran.clone())).expect("Failed to build test server");

        let response = server.get("/admin").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/login?next=%2Fadmin");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_user_role_cannot_reach_admin_handler() {
        let ran = Arc::new(AtomicBool::new(false));
        let server = TestServer::new(guarded_app(ran.clone())).expect("Failed to build test server");

        let login = server.post("/test-login/user").await;
        login.assert_status(StatusCode::NO_CONTENT);
        let cookie = login.cookie("id");

        let response = server.get("/admin").add_cookie(cookie).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/login");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_admin_role_runs_handler() {
        let ran = Arc::new(AtomicBool::new(false));
        let server = TestServer::new(guarded_app(ran.clone())).expect("Failed to build test server");

        let login = server.post("/test-login/admin").await;
        let cookie = login.cookie("id");

        let response = server.get("/admin").add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("dashboard");
        assert!(ran.load(Ordering::SeqCst));
    }
}
