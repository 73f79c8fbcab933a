//! Multipart parsing for the add/edit book forms

use axum::extract::Multipart;
use bookstore_core::{models::BookFormInput, AppError};
use bytes::Bytes;

/// A file part the browser actually filled in.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Text fields and the two optional file parts of a book form.
#[derive(Debug, Clone, Default)]
pub struct BookSubmission {
    pub fields: BookFormInput,
    pub cover: Option<UploadedFile>,
    pub document: Option<UploadedFile>,
}

const COVER_FIELD: &str = "book_cover";
const DOCUMENT_FIELD: &str = "file";

/// Reads every part of a book form. Unknown fields are ignored.
///
/// A file input left empty arrives as a part with an empty filename and is
/// treated as absent.
pub async fn read_book_submission(mut multipart: Multipart) -> Result<BookSubmission, AppError> {
    let mut submission = BookSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form data: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if name == COVER_FIELD || name == DOCUMENT_FIELD {
            let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

            if filename.trim().is_empty() {
                continue;
            }
            let upload = Some(UploadedFile { filename, data });
            if name == COVER_FIELD {
                submission.cover = upload;
            } else {
                submission.document = upload;
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read form field: {}", e)))?;

        let fields = &mut submission.fields;
        match name.as_str() {
            "book_title" => fields.book_title = value,
            "book_description" => fields.book_description = value,
            "author_id" => fields.author_id = value,
            "category_id" => fields.category_id = value,
            "book_price" => fields.book_price = value,
            _ => {}
        }
    }

    Ok(submission)
}
