//! Bookstore Storage Library
//!
//! Local filesystem storage for uploaded book covers and book files.
//!
//! # Reference format
//!
//! Catalog rows store references relative to the static root:
//!
//! - **Covers**: `uploads/covers/{filename}`
//! - **Book files**: `uploads/files/{filename}`
//!
//! Filenames are sanitized and made unique per directory by [`place_unique`].

pub mod error;
pub mod local;
pub mod placement;
pub mod saga;
pub mod sanitize;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use local::{UploadKind, UploadStore, COVERS_PREFIX, DOCUMENTS_PREFIX};
pub use placement::{place_unique, PlacedFile, UploadTarget};
pub use saga::UploadSaga;
pub use sanitize::secure_filename;
