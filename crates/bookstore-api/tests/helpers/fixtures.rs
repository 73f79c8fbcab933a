//! Rows and uploads used across integration tests.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bookstore_api::auth::hash_password;

pub const PASSWORD: &str = "correct horse battery";

pub async fn create_admin(pool: &sqlx::PgPool, name: &str, email: &str, password: &str) -> i64 {
    let hash = hash_password(password).expect("Failed to hash password");
    sqlx::query_scalar("INSERT INTO admins (full_name, email, password_hash) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(email)
        .bind(hash)
        .fetch_one(pool)
        .await
        .expect("Failed to insert admin")
}

pub async fn create_user(pool: &sqlx::PgPool, name: &str, email: &str, password: &str) -> i64 {
    let hash = hash_password(password).expect("Failed to hash password");
    sqlx::query_scalar("INSERT INTO users (full_name, email, password_hash) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(email)
        .bind(hash)
        .fetch_one(pool)
        .await
        .expect("Failed to insert user")
}

pub async fn create_author(pool: &sqlx::PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO authors (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to insert author")
}

pub async fn create_category(pool: &sqlx::PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to insert category")
}

pub async fn count_books(pool: &sqlx::PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await
        .expect("Failed to count books")
}

/// Log in through the form; the session cookie is kept by the server.
pub async fn login(client: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    client
        .post("/login")
        .form(&[("email", email), ("password", password)])
        .await
}

/// Add-book form with a cover and a document under the given client filenames.
pub fn book_form(
    title: &str,
    author_id: i64,
    category_id: i64,
    cover_name: &str,
    file_name: &str,
) -> MultipartForm {
    MultipartForm::new()
        .add_text("book_title", title.to_string())
        .add_text("book_description", "A test book")
        .add_text("author_id", author_id.to_string())
        .add_text("category_id", category_id.to_string())
        .add_text("book_price", "12.50")
        .add_part(
            "book_cover",
            Part::bytes(b"\x89PNG fake cover".to_vec())
                .file_name(cover_name.to_string())
                .mime_type("image/png"),
        )
        .add_part(
            "file",
            Part::bytes(b"%PDF-1.4 fake".to_vec())
                .file_name(file_name.to_string())
                .mime_type("application/pdf"),
        )
}
