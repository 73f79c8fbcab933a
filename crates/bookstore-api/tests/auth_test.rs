//! Login, session and guard integration tests.
//!
//! Run with: `cargo test -p bookstore-api --test auth_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use bookstore_core::INVALID_CREDENTIALS_MESSAGE;
use helpers::fixtures::{self, PASSWORD};
use helpers::{flash_messages, location, setup_test_app};

#[tokio::test]
async fn test_admin_wins_when_email_is_in_both_tables() {
    let app = setup_test_app().await;
    fixtures::create_admin(app.pool(), "Ada Admin", "shared@example.com", PASSWORD).await;
    fixtures::create_user(app.pool(), "Uma User", "shared@example.com", PASSWORD).await;

    let response = fixtures::login(app.client(), "Shared@Example.com ", PASSWORD).await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(location(&response), "/admin");

    let page: serde_json::Value = app.client().get("/admin").await.json();
    assert_eq!(page["viewer"]["role"], "admin");
    assert_eq!(page["viewer"]["name"], "Ada Admin");
}

#[tokio::test]
async fn test_user_logs_in_when_admin_password_differs() {
    let app = setup_test_app().await;
    fixtures::create_admin(app.pool(), "Ada Admin", "shared@example.com", "another password").await;
    fixtures::create_user(app.pool(), "Uma User", "shared@example.com", PASSWORD).await;

    let response = fixtures::login(app.client(), "shared@example.com", PASSWORD).await;
    assert_eq!(location(&response), "/me");

    let page: serde_json::Value = app.client().get("/me").await.json();
    assert_eq!(page["viewer"]["role"], "user");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = setup_test_app().await;
    fixtures::create_user(app.pool(), "Uma User", "uma@example.com", PASSWORD).await;

    for (email, password) in [("uma@example.com", "wrong password"), ("nobody@example.com", PASSWORD)] {
        let response = fixtures::login(app.client(), email, password).await;
        assert_eq!(response.status_code(), 303);
        assert_eq!(location(&response), "/login");

        let page: serde_json::Value = app.client().get("/login").await.json();
        assert_eq!(flash_messages(&page), vec![INVALID_CREDENTIALS_MESSAGE.to_string()]);
        assert!(page["viewer"].is_null());
    }
}

#[tokio::test]
async fn test_anonymous_get_redirects_with_return_target() {
    let app = setup_test_app().await;

    let response = app.client().get("/admin").add_query_param("q", "dune").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(location(&response), "/login?next=%2Fadmin%3Fq%3Ddune");

    let response = app.client().post("/delete_category/1").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_user_role_is_turned_away_from_admin_routes() {
    let app = setup_test_app().await;
    fixtures::create_user(app.pool(), "Uma User", "uma@example.com", PASSWORD).await;
    let category_id = fixtures::create_category(app.pool(), "Fiction").await;
    fixtures::login(app.client(), "uma@example.com", PASSWORD).await;

    let response = app.client().get("/admin").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(location(&response), "/login");

    let response = app
        .client()
        .post(&format!("/delete_category/{}", category_id))
        .await;
    assert_eq!(location(&response), "/login");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 1);

    // Customer-only routes still work for the same session.
    let response = app.client().get("/user").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_admin_is_turned_away_from_customer_routes() {
    let app = setup_test_app().await;
    fixtures::create_admin(app.pool(), "Ada Admin", "ada@example.com", PASSWORD).await;
    fixtures::login(app.client(), "ada@example.com", PASSWORD).await;

    let response = app.client().get("/user").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_follows_safe_next_only() {
    let app = setup_test_app().await;
    fixtures::create_user(app.pool(), "Uma User", "uma@example.com", PASSWORD).await;

    let response = app
        .client()
        .post("/login")
        .add_query_param("next", "/store?page=2")
        .form(&[("email", "uma@example.com"), ("password", PASSWORD)])
        .await;
    assert_eq!(location(&response), "/store?page=2");

    let response = app
        .client()
        .post("/login")
        .form(&[
            ("email", "uma@example.com"),
            ("password", PASSWORD),
            ("next", "https://evil.example.com/"),
        ])
        .await;
    assert_eq!(location(&response), "/me");
}

#[tokio::test]
async fn test_login_issues_a_fresh_session_id() {
    let app = setup_test_app().await;
    fixtures::create_user(app.pool(), "Uma User", "uma@example.com", PASSWORD).await;

    // A failed attempt stores a flash, which starts an anonymous session.
    let failed = fixtures::login(app.client(), "uma@example.com", "wrong password").await;
    let anonymous_id = failed.cookie("id").value().to_string();

    let response = fixtures::login(app.client(), "uma@example.com", PASSWORD).await;
    let authenticated_id = response.cookie("id").value().to_string();

    assert_ne!(anonymous_id, authenticated_id);
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let app = setup_test_app().await;
    fixtures::create_admin(app.pool(), "Ada Admin", "ada@example.com", PASSWORD).await;
    fixtures::login(app.client(), "ada@example.com", PASSWORD).await;

    let response = app.client().post("/logout").await;
    assert_eq!(location(&response), "/");

    let response = app.client().get("/admin").await;
    assert_eq!(location(&response), "/login?next=%2Fadmin");
}

#[tokio::test]
async fn test_register_then_login() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/register")
        .form(&[
            ("full_name", "New Reader"),
            ("email", "Reader@Example.com"),
            ("password", PASSWORD),
            ("confirm_password", PASSWORD),
        ])
        .await;
    assert_eq!(location(&response), "/login");

    let response = app
        .client()
        .post("/register")
        .form(&[
            ("full_name", "Someone Else"),
            ("email", "reader@example.com"),
            ("password", PASSWORD),
            ("confirm_password", PASSWORD),
        ])
        .await;
    assert_eq!(location(&response), "/register");

    let response = fixtures::login(app.client(), "reader@example.com", PASSWORD).await;
    assert_eq!(location(&response), "/me");
}
