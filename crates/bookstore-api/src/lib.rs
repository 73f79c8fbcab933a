//! Bookstore API Library
//!
//! HTTP handlers, session authentication, back-office services and
//! application setup for the bookstore server.

pub mod constants;
pub mod flash;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
