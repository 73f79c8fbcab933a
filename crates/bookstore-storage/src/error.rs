//! Storage error types

use thiserror::Error;

/// Upload storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Extension not allowed: {0}")]
    ExtensionNotAllowed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
