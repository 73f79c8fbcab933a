//! Error types module
//!
//! All fallible operations in the bookstore funnel into [`AppError`]. Each variant
//! self-describes how it should be presented through [`ErrorMetadata`], so the HTTP
//! layer can render a JSON body or turn the error into a flash message without
//! matching on variants itself.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as form validation failures
    Debug,
    /// Recoverable issues worth noticing, e.g. blocked deletes or failed logins
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// Missing or malformed input the user can correct.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate name on create or rename.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Delete blocked by dependent rows.
    #[error("Referential integrity: {0}")]
    ReferentialIntegrity(String),

    /// Writing an uploaded file failed.
    #[error("Storage I/O error: {0}")]
    StorageIo(String),

    /// Login failure. Never says whether the email or the password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::StorageIo(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Surface the first field message so forms show one actionable line.
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("Validation error: {}", err));
        AppError::Validation(message)
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Validation(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Correct the highlighted fields and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Conflict(_) => (
            409,
            "CONFLICT",
            false,
            Some("Choose a different name"),
            false,
            LogLevel::Debug,
        ),
        AppError::ReferentialIntegrity(_) => (
            409,
            "REFERENTIAL_INTEGRITY",
            false,
            Some("Remove or reassign dependent records first"),
            false,
            LogLevel::Warn,
        ),
        AppError::StorageIo(_) => (
            500,
            "STORAGE_IO_ERROR",
            true,
            Some("Retry the upload"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidCredentials => (
            401,
            "INVALID_CREDENTIALS",
            false,
            Some("Check email and password"),
            false,
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
            AppError::Conflict(_) => "Conflict",
            AppError::ReferentialIntegrity(_) => "ReferentialIntegrity",
            AppError::StorageIo(_) => "StorageIo",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }

    /// True when the underlying database error is a foreign key violation.
    #[cfg(feature = "sqlx")]
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            AppError::Database(SqlxError::Database(db_err)) => db_err.is_foreign_key_violation(),
            _ => false,
        }
    }

    /// True when the underlying database error is a unique constraint violation.
    #[cfg(feature = "sqlx")]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(SqlxError::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Validation(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::ReferentialIntegrity(ref msg) => msg.clone(),
            AppError::StorageIo(_) => "Failed to save uploaded files.".to_string(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to access database");
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        let err = AppError::InvalidCredentials;
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.client_message(), "Invalid email or password.");
        assert!(!err.client_message().to_lowercase().contains("admin"));
    }

    #[test]
    fn test_user_facing_messages_pass_through() {
        let err = AppError::ReferentialIntegrity(
            "Cannot delete 'Novel' because 2 book(s) are assigned to it.".to_string(),
        );
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(err.client_message().contains("2 book(s)"));

        let err = AppError::Conflict("Author 'Tolstoy' already exists.".to_string());
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.client_message(), "Author 'Tolstoy' already exists.");
    }

    #[test]
    fn test_storage_io_hides_path_details() {
        let err = AppError::from(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "/srv/static/uploads/covers/a.png",
        ));
        assert_eq!(err.error_type(), "StorageIo");
        assert_eq!(err.client_message(), "Failed to save uploaded files.");
        assert!(err.detailed_message().contains("uploads/covers"));
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_non_database_errors_are_not_constraint_violations() {
        let err = AppError::NotFound("Book not found.".to_string());
        assert!(!err.is_foreign_key_violation());
        assert!(!err.is_unique_violation());
        assert!(!AppError::from(sqlx::Error::RowNotFound).is_foreign_key_violation());
    }
}
