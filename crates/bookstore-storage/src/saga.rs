//! File-then-database write sequencing with compensating deletes
//!
//! Files and catalog rows live in different systems, so there is no shared
//! transaction. An [`UploadSaga`] records every file it writes; once the row
//! commits the saga is completed, otherwise [`UploadSaga::compensate`] deletes
//! what was written. Compensation is best-effort: a failed delete is logged
//! and leaves an orphan file behind.

use bytes::Bytes;

use crate::local::{UploadKind, UploadStore};
use crate::placement::PlacedFile;
use crate::StorageResult;

pub struct UploadSaga<'a> {
    store: &'a UploadStore,
    placed: Vec<PlacedFile>,
}

impl<'a> UploadSaga<'a> {
    pub fn begin(store: &'a UploadStore) -> Self {
        Self {
            store,
            placed: Vec::new(),
        }
    }

    /// Store one upload and remember it for compensation.
    ///
    /// On failure the files already written by this saga are left for the
    /// caller to compensate.
    pub async fn save(
        &mut self,
        kind: UploadKind,
        client_filename: &str,
        data: Bytes,
    ) -> StorageResult<PlacedFile> {
        let placed = self.store.save(kind, client_filename, data).await?;
        self.placed.push(placed.clone());
        Ok(placed)
    }

    pub fn placed(&self) -> &[PlacedFile] {
        &self.placed
    }

    /// The database write succeeded; keep the files.
    pub fn complete(self) {
        tracing::debug!(files = self.placed.len(), "Upload saga completed");
    }

    /// Undo every write made through this saga.
    pub async fn compensate(self) {
        if self.placed.is_empty() {
            return;
        }
        tracing::warn!(
            files = self.placed.len(),
            "Compensating uploads after failed database write"
        );
        let references: Vec<&str> = self.placed.iter().map(|p| p.relative_ref.as_str()).collect();
        self.store.delete_best_effort(&references).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn store(root: &std::path::Path) -> UploadStore {
        UploadStore::new(root, vec!["png".to_string()], vec!["pdf".to_string()])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_compensate_removes_placed_files() {
        let dir = tempdir().unwrap();
        let store = store(dir.path()).await;

        let mut saga = UploadSaga::begin(&store);
        let cover = saga
            .save(UploadKind::Cover, "c.png", Bytes::from_static(b"img"))
            .await
            .unwrap();
        let file = saga
            .save(UploadKind::Document, "b.pdf", Bytes::from_static(b"doc"))
            .await
            .unwrap();
        assert_eq!(saga.placed().len(), 2);

        saga.compensate().await;

        assert!(!cover.absolute_path.exists());
        assert!(!file.absolute_path.exists());
    }

    #[tokio::test]
    async fn test_failed_second_save_keeps_first_for_compensation() {
        let dir = tempdir().unwrap();
        let store = store(dir.path()).await;

        let mut saga = UploadSaga::begin(&store);
        let cover = saga
            .save(UploadKind::Cover, "c.png", Bytes::from_static(b"img"))
            .await
            .unwrap();
        assert!(saga
            .save(UploadKind::Document, "b.exe", Bytes::from_static(b"x"))
            .await
            .is_err());
        assert_eq!(saga.placed().len(), 1);

        saga.compensate().await;
        assert!(!cover.absolute_path.exists());
    }

    #[tokio::test]
    async fn test_complete_keeps_files() {
        let dir = tempdir().unwrap();
        let store = store(dir.path()).await;

        let mut saga = UploadSaga::begin(&store);
        let cover = saga
            .save(UploadKind::Cover, "c.png", Bytes::from_static(b"img"))
            .await
            .unwrap();
        saga.complete();

        assert!(cover.absolute_path.exists());
    }
}
