//! Public catalog, wishlist and contact integration tests.
//!
//! Run with: `cargo test -p bookstore-api --test catalog_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::fixtures::{self, PASSWORD};
use helpers::{flash_messages, location, setup_test_app, setup_test_app_with, TestApp};

/// Insert `count` books straight into the table, titled "Book 1", "Book 2", ...
async fn seed_books(app: &TestApp, count: usize) -> (i64, i64) {
    let author_id = fixtures::create_author(app.pool(), "Ursula K. Le Guin").await;
    let category_id = fixtures::create_category(app.pool(), "Fantasy").await;
    for n in 1..=count {
        sqlx::query(
            "INSERT INTO books (title, author_id, category_id, price, cover, file) VALUES ($1, $2, $3, $4::NUMERIC, 'c.png', 'f.pdf')",
        )
        .bind(format!("Book {}", n))
        .bind(author_id)
        .bind(category_id)
        .bind(n as i64)
        .execute(app.pool())
        .await
        .unwrap();
    }
    (author_id, category_id)
}

#[tokio::test]
async fn test_store_clamps_page_and_falls_back_on_unknown_sort() {
    let app = setup_test_app().await;
    seed_books(&app, 13).await;

    let page: serde_json::Value = app
        .client()
        .get("/store")
        .add_query_param("page", "9")
        .add_query_param("sort", "cheapest")
        .await
        .json();

    assert_eq!(page["pagination"]["total"], 13);
    assert_eq!(page["pagination"]["total_pages"], 2);
    assert_eq!(page["pagination"]["page"], 2);
    assert_eq!(page["query"]["sort"], "newest");
    assert_eq!(page["books"].as_array().unwrap().len(), 1);
    assert_eq!(page["books"][0]["title"], "Book 1");
}

#[tokio::test]
async fn test_store_search_treats_wildcards_literally() {
    let app = setup_test_app().await;
    seed_books(&app, 3).await;

    let page: serde_json::Value = app
        .client()
        .get("/store")
        .add_query_param("q", "%")
        .await
        .json();
    assert_eq!(page["pagination"]["total"], 0);

    let page: serde_json::Value = app
        .client()
        .get("/store")
        .add_query_param("q", "le guin")
        .add_query_param("sort", "price_desc")
        .await
        .json();
    assert_eq!(page["pagination"]["total"], 3);
    assert_eq!(page["books"][0]["title"], "Book 3");
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/book/999").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_wishlist_toggle_adds_then_removes() {
    let app = setup_test_app().await;
    seed_books(&app, 1).await;
    let book_id: i64 = sqlx::query_scalar("SELECT id FROM books")
        .fetch_one(app.pool())
        .await
        .unwrap();
    fixtures::create_user(app.pool(), "Uma User", "uma@example.com", PASSWORD).await;
    fixtures::login(app.client(), "uma@example.com", PASSWORD).await;

    let path = format!("/wishlist/toggle/{}", book_id);

    let response = app.client().post(&path).form(&[("next", "/store")]).await;
    assert_eq!(location(&response), "/store");

    let page: serde_json::Value = app.client().get("/me").await.json();
    assert_eq!(flash_messages(&page), vec!["Added to wishlist.".to_string()]);
    assert_eq!(page["wishlist"].as_array().unwrap().len(), 1);

    // An off-site target falls back to the profile page.
    let response = app
        .client()
        .post(&path)
        .form(&[("next", "//evil.example.com")])
        .await;
    assert_eq!(location(&response), "/me");

    let page: serde_json::Value = app.client().get("/me").await.json();
    assert_eq!(flash_messages(&page), vec!["Removed from wishlist.".to_string()]);
    assert!(page["wishlist"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_contact_honeypot_stores_nothing() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/contact")
        .form(&[
            ("name", "Bot"),
            ("email", "bot@example.com"),
            ("subject", "Buy now"),
            ("message", "Spam"),
            ("website", "http://spam.example.com"),
        ])
        .await;
    assert_eq!(location(&response), "/contact");

    let response = app
        .client()
        .post("/contact")
        .form(&[
            ("name", "Reader"),
            ("email", "reader@example.com"),
            ("subject", "Hello"),
            ("message", "Do you ship abroad?"),
            ("copy", "on"),
        ])
        .await;
    assert_eq!(location(&response), "/contact");

    let stored: Vec<(String, bool)> =
        sqlx::query_as("SELECT name, want_copy FROM contact_messages")
            .fetch_all(app.pool())
            .await
            .unwrap();
    assert_eq!(stored, vec![("Reader".to_string(), true)]);
}

#[tokio::test]
async fn test_request_body_over_configured_limit_is_rejected() {
    let app = setup_test_app_with(|config| config.max_upload_size_bytes = 1024).await;
    let message = "x".repeat(4096);

    let response = app
        .client()
        .post("/contact")
        .form(&[
            ("name", "Reader"),
            ("email", "reader@example.com"),
            ("subject", "Hello"),
            ("message", message.as_str()),
        ])
        .await;
    assert_eq!(response.status_code(), 413);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_health_reports_database_and_storage() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}
