use axum::http::{header, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};

/// Forbids caching of every response.
///
/// Pages embed session-dependent content (flash messages, the logged-in name),
/// so the back button must never replay a page from another session state.
pub async fn no_cache_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0, private"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_no_cache_headers_are_set() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(no_cache_middleware))
            .layer(axum::middleware::from_fn(
                crate::middleware::security_headers_middleware,
            ))
            .layer(axum::middleware::from_fn(
                crate::middleware::request_id_middleware,
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, max-age=0, private"
        );
        assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
        assert_eq!(headers.get(header::EXPIRES).unwrap(), "0");
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert!(headers.contains_key("X-Request-ID"));
    }
}
