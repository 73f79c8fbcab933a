//! Bookstore Database Library
//!
//! sqlx/PostgreSQL repositories for the catalog, identities, wishlists and
//! contact messages.

pub mod db;

pub use db::{
    AuthorRepository, BookRepository, CatalogRepository, CategoryRepository, ContactRepository,
    CountOrder, DeleteOutcome, IdentityRepository, StorePage, TransactionGuard,
    WishlistRepository,
};
