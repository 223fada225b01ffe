//! Read-only document store backed by a JSON export

use async_trait::async_trait;
use checklist_core::{ContentVersionId, Document, DocumentStatus, RecordId};
use checklist_engine::{DocumentStore, StoreError, StoreErrorKind, StoreOperation};
use std::path::{Path, PathBuf};

/// JSON array of documents on disk, in store order
///
/// Every record sees the same documents. Write operations are rejected.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store reading `path` on every fetch
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_only(operation: StoreOperation) -> StoreError {
        StoreError::new(
            operation,
            StoreErrorKind::Rejected,
            "document export is read-only",
        )
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn fetch_documents(&self, _record_id: &RecordId) -> Result<Vec<Document>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            let kind = if e.kind() == std::io::ErrorKind::NotFound {
                StoreErrorKind::NotFound
            } else {
                StoreErrorKind::Transport
            };
            StoreError::new(
                StoreOperation::FetchDocuments,
                kind,
                format!("{}: {e}", self.path.display()),
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            StoreError::new(
                StoreOperation::FetchDocuments,
                StoreErrorKind::Rejected,
                format!("{}: {e}", self.path.display()),
            )
        })
    }

    async fn save_new_version(
        &self,
        _content_version_id: &ContentVersionId,
        _new_title: &str,
        _record_id: &RecordId,
    ) -> Result<ContentVersionId, StoreError> {
        Err(Self::read_only(StoreOperation::SaveNewVersion))
    }

    async fn create_or_rename(
        &self,
        _content_version_id: &ContentVersionId,
        _new_title: &str,
    ) -> Result<(), StoreError> {
        Err(Self::read_only(StoreOperation::CreateOrRename))
    }

    async fn update_document_status(
        &self,
        _content_version_id: &ContentVersionId,
        _new_title: &str,
        _status: &DocumentStatus,
    ) -> Result<(), StoreError> {
        Err(Self::read_only(StoreOperation::UpdateDocumentStatus))
    }

    async fn upload_file(
        &self,
        _record_id: &RecordId,
        _file_name: &str,
        _base64_content: &str,
    ) -> Result<ContentVersionId, StoreError> {
        Err(Self::read_only(StoreOperation::UploadFile))
    }
}
