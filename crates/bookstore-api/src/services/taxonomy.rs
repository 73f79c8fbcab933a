//! Authors and categories: the name rules shared by their add, rename and delete forms.

use bookstore_core::{
    models::{Author, Category, MAX_CATEGORY_NAME_LEN},
    AppError,
};
use bookstore_db::{AuthorRepository, CategoryRepository, DeleteOutcome};

/// Result of a rename that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The new name equals the current one ignoring case; nothing was written.
    Unchanged,
    Renamed,
}

/// Trimmed replacement name, or `None` when it only differs from `current` by case.
fn check_rename(
    current: &str,
    requested: &str,
    empty_message: &str,
) -> Result<Option<String>, AppError> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(AppError::Validation(empty_message.to_string()));
    }
    if requested.to_lowercase() == current.to_lowercase() {
        return Ok(None);
    }
    Ok(Some(requested.to_string()))
}

fn check_category_length(name: &str) -> Result<(), AppError> {
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Category name is too long (max {} chars).",
            MAX_CATEGORY_NAME_LEN
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct TaxonomyService {
    authors: AuthorRepository,
    categories: CategoryRepository,
}

impl TaxonomyService {
    pub fn new(authors: AuthorRepository, categories: CategoryRepository) -> Self {
        Self {
            authors,
            categories,
        }
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>, AppError> {
        self.authors.list().await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }

    pub async fn get_author(&self, id: i64) -> Result<Author, AppError> {
        self.authors
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found.".to_string()))
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, AppError> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))
    }

    pub async fn add_author(&self, name: &str) -> Result<Author, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Invalid Author Name".to_string()));
        }
        if self.authors.name_exists(name, None).await? {
            return Err(AppError::Conflict(format!("Author '{}' already exists.", name)));
        }

        let author = self.authors.create(name).await?;
        tracing::info!(author_id = author.id, name = %author.name, "Author created");
        Ok(author)
    }

    pub async fn add_category(&self, name: &str) -> Result<Category, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Invalid Category Name.".to_string()));
        }
        check_category_length(name)?;
        if self.categories.name_exists(name, None).await? {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists.",
                name
            )));
        }

        let category = self.categories.create(name).await?;
        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn rename_author(&self, id: i64, requested: &str) -> Result<RenameOutcome, AppError> {
        let author = self.get_author(id).await?;
        let Some(name) = check_rename(&author.name, requested, "Author name cannot be empty.")?
        else {
            return Ok(RenameOutcome::Unchanged);
        };
        if self.authors.name_exists(&name, Some(id)).await? {
            return Err(AppError::Conflict("Author already exists.".to_string()));
        }

        self.authors.rename(id, &name).await?;
        Ok(RenameOutcome::Renamed)
    }

    pub async fn rename_category(
        &self,
        id: i64,
        requested: &str,
    ) -> Result<RenameOutcome, AppError> {
        let category = self.get_category(id).await?;
        let Some(name) =
            check_rename(&category.name, requested, "Category name cannot be empty.")?
        else {
            return Ok(RenameOutcome::Unchanged);
        };
        check_category_length(&name)?;
        if self.categories.name_exists(&name, Some(id)).await? {
            return Err(AppError::Conflict("Category already exists.".to_string()));
        }

        self.categories.rename(id, &name).await?;
        Ok(RenameOutcome::Renamed)
    }

    /// Delete an author no book references. Returns the deleted name.
    pub async fn delete_author(&self, id: i64) -> Result<String, AppError> {
        match self.authors.delete_unreferenced(id).await? {
            DeleteOutcome::NotFound => Err(AppError::NotFound("Author not found.".to_string())),
            DeleteOutcome::Blocked { book_count, .. } => {
                Err(AppError::ReferentialIntegrity(format!(
                    "Cannot delete author because {} book(s) reference them.",
                    book_count
                )))
            }
            DeleteOutcome::Deleted { name } => {
                tracing::info!(author_id = id, name = %name, "Author deleted");
                Ok(name)
            }
        }
    }

    /// Delete a category no book is assigned to. Returns the deleted name.
    pub async fn delete_category(&self, id: i64) -> Result<String, AppError> {
        match self.categories.delete_unreferenced(id).await? {
            DeleteOutcome::NotFound => Err(AppError::NotFound("Category not found.".to_string())),
            DeleteOutcome::Blocked { name, book_count } => {
                Err(AppError::ReferentialIntegrity(format!(
                    "Cannot delete '{}' because {} book(s) are assigned to it.",
                    name, book_count
                )))
            }
            DeleteOutcome::Deleted { name } => {
                tracing::info!(category_id = id, name = %name, "Category deleted");
                Ok(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_ignoring_case_is_unchanged() {
        assert_eq!(check_rename("Fantasy", " fANTASY ", "empty").unwrap(), None);
    }

    #[test]
    fn test_rename_to_new_name() {
        assert_eq!(
            check_rename("Fantasy", " High Fantasy ", "empty").unwrap(),
            Some("High Fantasy".to_string())
        );
    }

    #[test]
    fn test_rename_rejects_blank() {
        let err = check_rename("Fantasy", "   ", "Category name cannot be empty.").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Category name cannot be empty."));
    }

    #[test]
    fn test_category_length_limit() {
        assert!(check_category_length(&"a".repeat(MAX_CATEGORY_NAME_LEN)).is_ok());
        let err = check_category_length(&"a".repeat(MAX_CATEGORY_NAME_LEN + 1)).unwrap_err();
        assert!(err.to_string().contains("max 80 chars"));
    }
}
