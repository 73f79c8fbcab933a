use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{parse_id, parse_price, required_text};
use crate::AppError;

/// Row of the `books` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub category_id: i64,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    /// Relative reference under the static root, e.g. `uploads/covers/dune.png`.
    pub cover: String,
    /// Relative reference under the static root, e.g. `uploads/files/dune.pdf`.
    pub file: String,
    pub date_added: NaiveDate,
}

/// Book joined with its author and category names, as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookListing {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cover: String,
    pub file: String,
    pub date_added: NaiveDate,
    pub author_id: i64,
    pub author_name: String,
    pub category_id: i64,
    pub category_name: String,
}

/// Validated scalar fields of a book form. Files are handled separately.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub description: Option<String>,
    pub author_id: i64,
    pub category_id: i64,
    pub price: Option<Decimal>,
}

/// Raw text fields submitted by the add/edit book forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFormInput {
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub book_description: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub book_price: String,
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl BookFormInput {
    /// Checks a new-book submission in the order the form reports problems.
    pub fn validate_new(&self) -> Result<BookDraft, AppError> {
        let title = required_text(&self.book_title, "Book title cannot be empty.")?;
        if self.author_id.trim().is_empty() {
            return Err(AppError::Validation("Please select an author.".to_string()));
        }
        if self.category_id.trim().is_empty() {
            return Err(AppError::Validation("Please select a category.".to_string()));
        }
        let (author_id, category_id) =
            match (parse_id(&self.author_id), parse_id(&self.category_id)) {
                (Some(a), Some(c)) => (a, c),
                _ => {
                    return Err(AppError::Validation(
                        "Invalid author or category.".to_string(),
                    ))
                }
            };
        let price = parse_price(&self.book_price)?;

        Ok(BookDraft {
            title,
            description: optional_text(&self.book_description),
            author_id,
            category_id,
            price,
        })
    }

    /// Checks an edit submission. An empty price clears the stored price.
    pub fn validate_edit(&self) -> Result<BookDraft, AppError> {
        let title = required_text(&self.book_title, "Title cannot be empty.")?;
        let (author_id, category_id) =
            match (parse_id(&self.author_id), parse_id(&self.category_id)) {
                (Some(a), Some(c)) => (a, c),
                _ => {
                    return Err(AppError::Validation(
                        "Please select a valid author and category.".to_string(),
                    ))
                }
            };
        let price = parse_price(&self.book_price)?;

        Ok(BookDraft {
            title,
            description: optional_text(&self.book_description),
            author_id,
            category_id,
            price,
        })
    }
}

/// Full target state of a book after an edit, including file references.
#[derive(Debug, Clone, PartialEq)]
pub struct BookUpdate {
    pub draft: BookDraft,
    pub cover: String,
    pub file: String,
}

impl BookUpdate {
    /// Whether applying this update would change the stored row.
    ///
    /// Titles compare case-insensitively and prices numerically (`12.5 == 12.50`);
    /// everything else compares exactly.
    pub fn changes(&self, current: &Book) -> bool {
        let d = &self.draft;
        d.title.to_lowercase() != current.title.trim().to_lowercase()
            || d.description.as_deref().unwrap_or("")
                != current.description.as_deref().unwrap_or("").trim()
            || d.author_id != current.author_id
            || d.category_id != current.category_id
            || d.price.map(|p| p.normalize()) != current.price.map(|p| p.normalize())
            || self.cover != current.cover
            || self.file != current.file
    }
}
