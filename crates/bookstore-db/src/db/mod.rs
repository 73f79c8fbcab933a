//! Database repositories for data access layer
//!
//! Each repository owns one table (or, for the catalog, the read-side joins
//! across books, authors and categories) and returns domain models or
//! [`bookstore_core::AppError`].

pub mod author;
pub mod book;
pub mod catalog;
pub mod category;
pub mod contact;
pub mod identity;
pub mod transaction;
pub mod wishlist;

pub use author::AuthorRepository;
pub use book::BookRepository;
pub use catalog::{CatalogRepository, CountOrder, StorePage};
pub use category::CategoryRepository;
pub use contact::ContactRepository;
pub use identity::IdentityRepository;
pub use transaction::TransactionGuard;
pub use wishlist::WishlistRepository;

/// Result of a guarded delete on a table other rows depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    NotFound,
    /// Dependent books exist; nothing was removed.
    Blocked { name: String, book_count: i64 },
    Deleted { name: String },
}
