//! HTTP error response conversion
//!
//! JSON endpoints return `Result<impl IntoResponse, HttpAppError>` and let the
//! error render itself. Form endpoints recover most errors into flash messages
//! instead (see [`crate::flash`]); only unexpected failures reach this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookstore_core::{AppError, ErrorMetadata, LogLevel};
use bookstore_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: `AppError` lives in bookstore-core, `IntoResponse` in axum).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<tower_sessions::session::Error> for HttpAppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        HttpAppError(session_error(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error(err))
    }
}

/// Session store failures are unexpected; they never carry user-facing detail.
pub fn session_error(err: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("Session error: {}", err))
}

/// Maps upload storage failures onto the domain taxonomy.
pub fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidFilename(msg) | StorageError::ExtensionNotAllowed(msg) => {
            AppError::Validation(msg)
        }
        StorageError::InvalidReference(msg) => AppError::Internal(msg),
        StorageError::UploadFailed(msg) | StorageError::DeleteFailed(msg) => {
            AppError::StorageIo(msg)
        }
        StorageError::IoError(err) => AppError::StorageIo(err.to_string()),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

pub(crate) fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let is_production = is_production_env();

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details are hidden in production and for sensitive errors.
        let body = if is_production || app_error.is_sensitive() {
            ErrorResponse {
                error: app_error.client_message(),
                details: None,
                error_type: None,
                code: app_error.error_code().to_string(),
                recoverable: app_error.is_recoverable(),
                suggested_action: app_error.suggested_action().map(String::from),
            }
        } else {
            ErrorResponse {
                error: app_error.client_message(),
                details: Some(app_error.detailed_message()),
                error_type: Some(app_error.error_type().to_string()),
                code: app_error.error_code().to_string(),
                recoverable: app_error.is_recoverable(),
                suggested_action: app_error.suggested_action().map(String::from),
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_domain() {
        let err = storage_error(StorageError::InvalidFilename("empty".to_string()));
        assert!(matches!(err, AppError::Validation(_)));

        let err = storage_error(StorageError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )));
        assert!(matches!(err, AppError::StorageIo(_)));
        assert_eq!(err.client_message(), "Failed to save uploaded files.");
    }

    #[test]
    fn test_not_found_renders_404() {
        let response =
            HttpAppError(AppError::NotFound("Book not found.".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
