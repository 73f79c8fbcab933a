//! Book writes that span the upload directories and the `books` table.
//!
//! Files are written first and the row second. An [`UploadSaga`] tracks the
//! files so they can be deleted again when the row write fails.

use bookstore_core::{
    models::{Book, BookUpdate},
    AppError,
};
use bookstore_db::BookRepository;
use bookstore_storage::{UploadKind, UploadSaga, UploadStore};
use std::sync::Arc;

use crate::error::storage_error;
use crate::flash::Flash;
use crate::utils::{BookSubmission, UploadedFile};

/// Result of an edit that passed validation.
#[derive(Debug)]
pub enum EditOutcome {
    /// Every field matched the stored row; nothing was written.
    Unchanged,
    Updated(Book),
}

#[derive(Clone)]
pub struct BookService {
    books: BookRepository,
    uploads: Arc<UploadStore>,
}

fn not_found() -> AppError {
    AppError::NotFound("Book not found.".to_string())
}

fn rejected_extension_message(kind: UploadKind, allowed: &[String], on_create: bool) -> String {
    let allowed = allowed.join(", ");
    match (kind, on_create) {
        (UploadKind::Cover, true) => format!("Invalid cover file type. Allowed: {}.", allowed),
        (UploadKind::Cover, false) => format!("Invalid cover type. Allowed: {}.", allowed),
        (UploadKind::Document, _) => format!("Invalid book file type. Allowed: {}.", allowed),
    }
}

impl BookService {
    pub fn new(books: BookRepository, uploads: Arc<UploadStore>) -> Self {
        Self { books, uploads }
    }

    pub async fn get(&self, id: i64) -> Result<Book, AppError> {
        self.books.get(id).await?.ok_or_else(not_found)
    }

    /// Validate a new book, store both files, then insert the row.
    pub async fn create(&self, submission: BookSubmission) -> Result<Book, AppError> {
        let draft = submission.fields.validate_new()?;
        let cover = submission
            .cover
            .ok_or_else(|| AppError::Validation("Please upload a book cover.".to_string()))?;
        let document = submission
            .document
            .ok_or_else(|| AppError::Validation("Please upload the book file.".to_string()))?;

        for (kind, upload) in [(UploadKind::Cover, &cover), (UploadKind::Document, &document)] {
            let target = self.uploads.target(kind);
            if !target.accepts(&upload.filename) {
                return Err(AppError::Validation(rejected_extension_message(
                    kind,
                    target.allowed_extensions(),
                    true,
                )));
            }
        }

        if !self
            .books
            .author_and_category_exist(draft.author_id, draft.category_id)
            .await?
        {
            return Err(AppError::Validation("Invalid author or category.".to_string()));
        }

        let mut saga = UploadSaga::begin(&self.uploads);

        let cover_ref = match saga.save(UploadKind::Cover, &cover.filename, cover.data).await {
            Ok(placed) => placed.relative_ref,
            Err(e) => {
                saga.compensate().await;
                return Err(storage_error(e));
            }
        };
        let file_ref = match saga
            .save(UploadKind::Document, &document.filename, document.data)
            .await
        {
            Ok(placed) => placed.relative_ref,
            Err(e) => {
                saga.compensate().await;
                return Err(storage_error(e));
            }
        };

        match self.books.insert(&draft, &cover_ref, &file_ref).await {
            Ok(book) => {
                saga.complete();
                tracing::info!(book_id = book.id, title = %book.title, "Book created");
                Ok(book)
            }
            Err(e) => {
                saga.compensate().await;
                if e.is_foreign_key_violation() {
                    return Err(AppError::Validation("Invalid author or category.".to_string()));
                }
                Err(e)
            }
        }
    }

    /// Store a replacement upload, or keep `existing` when there is none or it is rejected.
    async fn replacement(
        &self,
        saga: &mut UploadSaga<'_>,
        kind: UploadKind,
        upload: Option<UploadedFile>,
        existing: &str,
        notices: &mut Vec<Flash>,
    ) -> String {
        let Some(upload) = upload else {
            return existing.to_string();
        };

        let target = self.uploads.target(kind);
        if !target.accepts(&upload.filename) {
            notices.push(Flash::warning(rejected_extension_message(
                kind,
                target.allowed_extensions(),
                false,
            )));
            return existing.to_string();
        }

        match saga.save(kind, &upload.filename, upload.data).await {
            Ok(placed) => placed.relative_ref,
            Err(e) => {
                tracing::error!(error = %e, kind = ?kind, "Failed to store replacement upload");
                notices.push(Flash::danger(match kind {
                    UploadKind::Cover => "Failed to save new cover.",
                    UploadKind::Document => "Failed to save new file.",
                }));
                existing.to_string()
            }
        }
    }

    /// Apply an edit.
    ///
    /// Replacement files are optional. A rejected or failed replacement adds a
    /// notice and keeps the stored reference. An edit equal to the stored row
    /// writes nothing. Superseded files stay on disk.
    pub async fn update(
        &self,
        id: i64,
        submission: BookSubmission,
        notices: &mut Vec<Flash>,
    ) -> Result<EditOutcome, AppError> {
        let current = self.get(id).await?;
        let draft = submission.fields.validate_edit()?;

        let mut saga = UploadSaga::begin(&self.uploads);
        let cover = self
            .replacement(&mut saga, UploadKind::Cover, submission.cover, &current.cover, notices)
            .await;
        let file = self
            .replacement(
                &mut saga,
                UploadKind::Document,
                submission.document,
                &current.file,
                notices,
            )
            .await;

        let update = BookUpdate { draft, cover, file };
        if !update.changes(&current) {
            saga.compensate().await;
            return Ok(EditOutcome::Unchanged);
        }

        let duplicate = self
            .books
            .title_taken_by_other(&update.draft.title, update.draft.author_id, id)
            .await;
        match duplicate {
            Ok(false) => {}
            Ok(true) => {
                saga.compensate().await;
                return Err(AppError::Conflict(
                    "A book with this title and author already exists.".to_string(),
                ));
            }
            Err(e) => {
                saga.compensate().await;
                return Err(e);
            }
        }

        match self.books.update(id, &update).await {
            Ok(book) => {
                saga.complete();
                tracing::info!(book_id = id, "Book updated");
                Ok(EditOutcome::Updated(book))
            }
            Err(e) => {
                saga.compensate().await;
                if e.is_foreign_key_violation() {
                    return Err(AppError::Validation(
                        "Please select a valid author and category.".to_string(),
                    ));
                }
                Err(e)
            }
        }
    }

    /// Delete the row, then its files.
    ///
    /// A row still referenced elsewhere is refused and its files are left alone.
    /// File removal is best-effort.
    pub async fn delete(&self, id: i64) -> Result<Book, AppError> {
        let book = self.get(id).await?;
        if !self.books.delete(id).await? {
            return Err(not_found());
        }

        self.uploads
            .delete_best_effort(&[book.cover.as_str(), book.file.as_str()])
            .await;
        tracing::info!(book_id = id, "Book deleted");
        Ok(book)
    }
}
