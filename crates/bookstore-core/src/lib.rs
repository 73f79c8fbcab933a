//! Bookstore Core Library
//!
//! Domain models, the error taxonomy, configuration, form validation and the
//! catalog query types shared by every bookstore crate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use catalog::{CatalogCounts, Pagination, StoreParams, StoreQuery, StoreSort};
pub use config::{BookstoreConfig, Config, SeedAdmin};
pub use error::{AppError, ErrorMetadata, LogLevel, INVALID_CREDENTIALS_MESSAGE};
