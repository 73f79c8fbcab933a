use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::placement::{place_unique, PlacedFile, UploadTarget};
use crate::{StorageError, StorageResult};

pub const COVERS_PREFIX: &str = "uploads/covers";
pub const DOCUMENTS_PREFIX: &str = "uploads/files";

/// Which upload root a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Cover,
    Document,
}

/// Local filesystem store for book covers and book files under the static root.
#[derive(Debug, Clone)]
pub struct UploadStore {
    static_root: PathBuf,
    covers: UploadTarget,
    documents: UploadTarget,
}

impl UploadStore {
    /// Create both upload roots under `static_root` if they are missing.
    pub async fn new(
        static_root: impl Into<PathBuf>,
        cover_extensions: Vec<String>,
        document_extensions: Vec<String>,
    ) -> StorageResult<Self> {
        let static_root = static_root.into();

        for prefix in [COVERS_PREFIX, DOCUMENTS_PREFIX] {
            let dir = static_root.join(prefix);
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create upload directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let static_root = fs::canonicalize(&static_root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to canonicalize static root {}: {}",
                static_root.display(),
                e
            ))
        })?;

        Ok(UploadStore {
            covers: UploadTarget::new(static_root.join(COVERS_PREFIX), COVERS_PREFIX, cover_extensions),
            documents: UploadTarget::new(
                static_root.join(DOCUMENTS_PREFIX),
                DOCUMENTS_PREFIX,
                document_extensions,
            ),
            static_root,
        })
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    pub fn target(&self, kind: UploadKind) -> &UploadTarget {
        match kind {
            UploadKind::Cover => &self.covers,
            UploadKind::Document => &self.documents,
        }
    }

    /// Place `client_filename` in the root for `kind` and write `data` there.
    ///
    /// A failed write removes whatever was partially written.
    pub async fn save(
        &self,
        kind: UploadKind,
        client_filename: &str,
        data: Bytes,
    ) -> StorageResult<PlacedFile> {
        let target = self.target(kind);
        if !target.accepts(client_filename) {
            return Err(StorageError::ExtensionNotAllowed(format!(
                "Allowed: {}",
                target.allowed_extensions().join(", ")
            )));
        }

        let placed = place_unique(target, client_filename).await?;
        let size = data.len();
        let start = std::time::Instant::now();

        if let Err(e) = write_new_file(&placed.absolute_path, &data).await {
            if let Err(cleanup_err) = fs::remove_file(&placed.absolute_path).await {
                if cleanup_err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        error = %cleanup_err,
                        path = %placed.absolute_path.display(),
                        "Failed to remove partially written upload"
                    );
                }
            }
            return Err(e);
        }

        tracing::info!(
            path = %placed.absolute_path.display(),
            reference = %placed.relative_ref,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(placed)
    }

    /// Resolve a stored reference such as `uploads/covers/a.png` inside the static root.
    fn reference_to_path(&self, reference: &str) -> StorageResult<PathBuf> {
        if reference.is_empty()
            || reference.contains("..")
            || reference.starts_with('/')
            || reference.contains('\\')
        {
            return Err(StorageError::InvalidReference(reference.to_string()));
        }

        let under_root = |prefix: &str| {
            reference
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
        };
        if !(under_root(COVERS_PREFIX) || under_root(DOCUMENTS_PREFIX)) {
            return Err(StorageError::InvalidReference(reference.to_string()));
        }

        Ok(self.static_root.join(reference))
    }

    /// Delete the file behind a stored reference. Missing files are not an error.
    pub async fn delete(&self, reference: &str) -> StorageResult<()> {
        let path = self.reference_to_path(reference)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            reference = %reference,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload deleted"
        );

        Ok(())
    }

    /// Delete each reference, logging failures instead of returning them.
    pub async fn delete_best_effort(&self, references: &[&str]) {
        for reference in references {
            if let Err(e) = self.delete(reference).await {
                tracing::warn!(
                    error = %e,
                    reference = %reference,
                    "Best-effort file delete failed"
                );
            }
        }
    }
}

async fn write_new_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

    file.write_all(data).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;

    Ok(())
}
