//! Document store boundary
//!
//! The store owns documents and their statuses and is the single source of
//! truth. The engine never mutates its local copy of the document list; it
//! always reloads.

use crate::error::StoreError;
use async_trait::async_trait;
use checklist_core::{ContentVersionId, Document, DocumentStatus, RecordId};

/// External record/document service
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents attached to a record, in store order
    async fn fetch_documents(&self, record_id: &RecordId) -> Result<Vec<Document>, StoreError>;

    /// Replace the content of an existing logical document
    ///
    /// Returns the content version that now carries the title.
    async fn save_new_version(
        &self,
        content_version_id: &ContentVersionId,
        new_title: &str,
        record_id: &RecordId,
    ) -> Result<ContentVersionId, StoreError>;

    /// Assign a canonical title to a freshly uploaded document
    async fn create_or_rename(
        &self,
        content_version_id: &ContentVersionId,
        new_title: &str,
    ) -> Result<(), StoreError>;

    /// Set a document's review status
    async fn update_document_status(
        &self,
        content_version_id: &ContentVersionId,
        new_title: &str,
        status: &DocumentStatus,
    ) -> Result<(), StoreError>;

    /// Store raw bytes as a new document on the record
    async fn upload_file(
        &self,
        record_id: &RecordId,
        file_name: &str,
        base64_content: &str,
    ) -> Result<ContentVersionId, StoreError>;

    /// Whether a gated checklist applies to the record
    async fn is_checklist_required(
        &self,
        _record_id: &RecordId,
        _checklist_id: &str,
    ) -> Result<bool, StoreError> {
        Ok(true)
    }
}
