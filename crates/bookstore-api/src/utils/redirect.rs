//! Post-action redirect targets

use axum::http::{header, HeaderMap};
use bookstore_core::validation::is_safe_redirect;

/// First safe local path among the candidates, else `fallback`.
pub fn safe_target<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>, fallback: &'a str) -> &'a str {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|target| is_safe_redirect(target))
        .unwrap_or(fallback)
}

/// Path and query of a same-origin `Referer`, if the header carries one.
pub fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    if referer.starts_with('/') {
        return Some(referer.to_string());
    }

    let host = headers.get(header::HOST)?.to_str().ok()?;
    let without_scheme = referer
        .strip_prefix("http://")
        .or_else(|| referer.strip_prefix("https://"))?;
    let rest = without_scheme.strip_prefix(host)?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_first_safe_candidate_wins() {
        assert_eq!(safe_target([Some("//evil.example"), Some("/store")], "/me"), "/store");
        assert_eq!(safe_target([None, Some("https://evil.example")], "/me"), "/me");
        assert_eq!(safe_target([Some(" /book/3 ")], "/me"), "/book/3");
    }

    #[test]
    fn test_referer_must_match_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("shop.example"));
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://shop.example/store?page=2"),
        );
        assert_eq!(referer_path(&headers).as_deref(), Some("/store?page=2"));

        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://shop.example.evil.example/x"),
        );
        assert_eq!(referer_path(&headers), None);

        headers.insert(header::REFERER, HeaderValue::from_static("https://other.example/"));
        assert_eq!(referer_path(&headers), None);
    }
}
