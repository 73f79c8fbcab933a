//! One-shot messages carried across a redirect in the session.

use bookstore_core::{AppError, ErrorMetadata};
use serde::{Deserialize, Serialize};
use tower_sessions::{session::Error as SessionError, Session};

use crate::constants::SESSION_FLASHES_KEY;
use crate::error::log_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Danger,
    Warning,
    Info,
    Success,
}

impl FlashCategory {
    /// How a recovered error is shown on the next page.
    pub fn for_error(error: &AppError) -> Self {
        match error {
            AppError::Conflict(_) | AppError::ReferentialIntegrity(_) => FlashCategory::Warning,
            _ => FlashCategory::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Danger, message)
    }

    /// Logs the error at its declared level and phrases it for the user.
    pub fn from_error(error: &AppError) -> Self {
        log_error(error);
        Self::new(FlashCategory::for_error(error), error.client_message())
    }
}

pub async fn push(session: &Session, flash: Flash) -> Result<(), SessionError> {
    push_all(session, vec![flash]).await
}

pub async fn push_all(session: &Session, flashes: Vec<Flash>) -> Result<(), SessionError> {
    if flashes.is_empty() {
        return Ok(());
    }
    let mut pending = session
        .get::<Vec<Flash>>(SESSION_FLASHES_KEY)
        .await?
        .unwrap_or_default();
    pending.extend(flashes);
    session.insert(SESSION_FLASHES_KEY, pending).await
}

/// Pending messages in the order they were pushed. Reading consumes them.
pub async fn take(session: &Session) -> Result<Vec<Flash>, SessionError> {
    Ok(session
        .remove::<Vec<Flash>>(SESSION_FLASHES_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_flashes_are_consumed_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        push(&session, Flash::success("Author deleted.")).await.unwrap();
        push(&session, Flash::info("No changes were made.")).await.unwrap();

        let flashes = take(&session).await.unwrap();
        assert_eq!(
            flashes,
            vec![
                Flash::success("Author deleted."),
                Flash::info("No changes were made."),
            ]
        );
        assert!(take(&session).await.unwrap().is_empty());
    }

    #[test]
    fn test_error_categories() {
        let blocked = AppError::ReferentialIntegrity("in use".to_string());
        assert_eq!(FlashCategory::for_error(&blocked), FlashCategory::Warning);

        let invalid = AppError::Validation("Title cannot be empty.".to_string());
        let flash = Flash::from_error(&invalid);
        assert_eq!(flash.category, FlashCategory::Danger);
        assert_eq!(flash.message, "Title cannot be empty.");
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Flash::warning("x")).unwrap();
        assert_eq!(json, r#"{"category":"warning","message":"x"}"#);
    }
}
