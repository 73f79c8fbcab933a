//! Collision-free filename placement inside an upload directory

use std::path::{Path, PathBuf};

use crate::sanitize::{secure_filename, split_extension};
use crate::{StorageError, StorageResult};

/// A directory that receives uploads, plus the extensions it accepts.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    directory: PathBuf,
    /// Reference prefix relative to the static root, e.g. `uploads/covers`.
    reference_prefix: String,
    allowed_extensions: Vec<String>,
}

/// A filename chosen for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedFile {
    pub stored_name: String,
    pub absolute_path: PathBuf,
    /// What the catalog row stores, e.g. `uploads/covers/dune_1.png`.
    pub relative_ref: String,
}

impl UploadTarget {
    pub fn new(
        directory: impl Into<PathBuf>,
        reference_prefix: impl Into<String>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            reference_prefix: reference_prefix.into().trim_matches('/').to_string(),
            allowed_extensions,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Whether the client filename carries an extension this target accepts.
    pub fn accepts(&self, client_filename: &str) -> bool {
        bookstore_core::validation::has_allowed_extension(
            client_filename,
            &self.allowed_extensions,
        )
    }

    fn reference_for(&self, stored_name: &str) -> String {
        format!("{}/{}", self.reference_prefix, stored_name)
    }
}

/// Picks a filename in `target` that no existing file uses.
///
/// Tries the sanitized name first, then `stem_1.ext`, `stem_2.ext`, ... until a
/// free slot is found. Nothing is reserved: two concurrent placements can pick
/// the same name between this check and the write. The write in
/// [`crate::UploadStore::save`] uses create-new semantics, so the loser of such
/// a race fails instead of overwriting.
pub async fn place_unique(target: &UploadTarget, client_filename: &str) -> StorageResult<PlacedFile> {
    let sanitized = secure_filename(client_filename);
    if sanitized.is_empty() {
        return Err(StorageError::InvalidFilename(format!(
            "'{}' has no usable characters",
            client_filename
        )));
    }

    let (stem, ext) = split_extension(&sanitized);
    let mut candidate = sanitized.clone();
    let mut counter: u64 = 0;

    while tokio::fs::try_exists(target.directory.join(&candidate)).await? {
        counter += 1;
        candidate = format!("{}_{}{}", stem, counter, ext);
    }

    if counter > 0 {
        tracing::debug!(
            original = %sanitized,
            stored_name = %candidate,
            probes = counter,
            "Filename collision resolved"
        );
    }

    Ok(PlacedFile {
        absolute_path: target.directory.join(&candidate),
        relative_ref: target.reference_for(&candidate),
        stored_name: candidate,
    })
}
