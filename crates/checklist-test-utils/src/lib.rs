//! Testing utilities for the checklist workspace
//!
//! In-memory document store, recording notification sink and fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use checklist_core::{
    variants, ContentVersionId, DefinitionValidator, Document, DocumentId, DocumentStatus,
    RecordId, ValidatedChecklist,
};
use checklist_engine::{
    ChecklistViewModel, DocumentStore, Notification, NotificationKind, NotificationSink,
    StoreError, StoreOperation,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Record id used by fixtures
pub const TEST_RECORD: &str = "001TEST";

/// Status the store gives a document nobody has reviewed yet
pub const UNREVIEWED_STATUS: &str = "NEW";

/// `DocumentStatus` of a freshly stored document
pub fn unreviewed() -> DocumentStatus {
    DocumentStatus::Other(UNREVIEWED_STATUS.to_string())
}

/// Store call as received, for ordering assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FetchDocuments {
        record_id: RecordId,
    },
    SaveNewVersion {
        content_version_id: ContentVersionId,
        new_title: String,
        record_id: RecordId,
    },
    CreateOrRename {
        content_version_id: ContentVersionId,
        new_title: String,
    },
    UpdateDocumentStatus {
        content_version_id: ContentVersionId,
        new_title: String,
        status: DocumentStatus,
    },
    UploadFile {
        record_id: RecordId,
        file_name: String,
        base64_content: String,
    },
    CheckRequirement {
        record_id: RecordId,
        checklist_id: String,
    },
}

impl StoreCall {
    pub fn operation(&self) -> StoreOperation {
        match self {
            Self::FetchDocuments { .. } => StoreOperation::FetchDocuments,
            Self::SaveNewVersion { .. } => StoreOperation::SaveNewVersion,
            Self::CreateOrRename { .. } => StoreOperation::CreateOrRename,
            Self::UpdateDocumentStatus { .. } => StoreOperation::UpdateDocumentStatus,
            Self::UploadFile { .. } => StoreOperation::UploadFile,
            Self::CheckRequirement { .. } => StoreOperation::CheckRequirement,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    record_id: RecordId,
    document: Document,
}

/// In-memory `DocumentStore`
///
/// Documents are kept in insertion order per record. Every call is
/// recorded; any operation can be made to fail until faults are cleared.
pub struct InMemoryDocumentStore {
    documents: Mutex<Vec<StoredDocument>>,
    calls: Mutex<Vec<StoreCall>>,
    faults: Mutex<HashMap<StoreOperation, StoreError>>,
    fetch_delays: Mutex<VecDeque<Duration>>,
    required: AtomicBool,
    next_id: AtomicU64,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            faults: Mutex::new(HashMap::new()),
            fetch_delays: Mutex::new(VecDeque::new()),
            required: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
        }
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with documents on `record_id`
    pub fn with_documents(record_id: impl Into<RecordId>, documents: Vec<Document>) -> Self {
        let record_id = record_id.into();
        let stored = documents
            .into_iter()
            .map(|document| StoredDocument {
                record_id: record_id.clone(),
                document,
            })
            .collect();
        Self {
            documents: Mutex::new(stored),
            ..Self::default()
        }
    }

    fn next_ids(&self) -> (DocumentId, ContentVersionId) {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        (
            DocumentId::new(format!("069{n:05}")),
            ContentVersionId::new(format!("068{n:05}")),
        )
    }

    /// Attach a document with a generated id pair
    pub async fn insert(
        &self,
        record_id: impl Into<RecordId>,
        title: impl Into<String>,
        status: DocumentStatus,
    ) -> Document {
        let (id, cv) = self.next_ids();
        let document = Document::new(id, title, status, cv);
        self.documents.lock().await.push(StoredDocument {
            record_id: record_id.into(),
            document: document.clone(),
        });
        document
    }

    /// Simulate a platform uploader storing a file under its original name
    pub async fn platform_upload(
        &self,
        record_id: impl Into<RecordId>,
        file_name: impl Into<String>,
    ) -> ContentVersionId {
        self.insert(record_id, file_name, unreviewed())
            .await
            .content_version_id
    }

    /// Make every call of `operation` fail with `error`
    pub async fn fail_on(&self, operation: StoreOperation, error: StoreError) {
        self.faults.lock().await.insert(operation, error);
    }

    pub async fn clear_faults(&self) {
        self.faults.lock().await.clear();
    }

    /// Delay the next `fetch_documents` call after it has read its snapshot
    pub async fn delay_next_fetch(&self, delay: Duration) {
        self.fetch_delays.lock().await.push_back(delay);
    }

    /// Answer for the requirement gate
    pub fn set_required(&self, required: bool) {
        self.required.store(required, Ordering::SeqCst);
    }

    pub async fn set_status(&self, content_version_id: &ContentVersionId, status: DocumentStatus) {
        let mut documents = self.documents.lock().await;
        if let Some(stored) = documents
            .iter_mut()
            .find(|d| &d.document.content_version_id == content_version_id)
        {
            stored.document.status = status;
        }
    }

    /// Current documents on a record
    pub async fn documents(&self, record_id: &RecordId) -> Vec<Document> {
        self.documents
            .lock()
            .await
            .iter()
            .filter(|d| &d.record_id == record_id)
            .map(|d| d.document.clone())
            .collect()
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    /// Recorded operations, in call order
    pub async fn operations(&self) -> Vec<StoreOperation> {
        self.calls
            .lock()
            .await
            .iter()
            .map(StoreCall::operation)
            .collect()
    }

    pub async fn call_count(&self, operation: StoreOperation) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    async fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        let operation = call.operation();
        self.calls.lock().await.push(call);
        match self.faults.lock().await.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_documents(&self, record_id: &RecordId) -> Result<Vec<Document>, StoreError> {
        self.record(StoreCall::FetchDocuments {
            record_id: record_id.clone(),
        })
        .await?;

        let snapshot = self.documents(record_id).await;
        let delay = self.fetch_delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn save_new_version(
        &self,
        content_version_id: &ContentVersionId,
        new_title: &str,
        record_id: &RecordId,
    ) -> Result<ContentVersionId, StoreError> {
        self.record(StoreCall::SaveNewVersion {
            content_version_id: content_version_id.clone(),
            new_title: new_title.to_string(),
            record_id: record_id.clone(),
        })
        .await?;

        let (_, new_cv) = self.next_ids();
        let mut documents = self.documents.lock().await;
        let intake = documents
            .iter()
            .position(|d| &d.document.content_version_id == content_version_id)
            .ok_or_else(|| {
                StoreError::not_found(
                    StoreOperation::SaveNewVersion,
                    format!("content version {content_version_id} not found"),
                )
            })?;

        let existing = documents.iter().position(|d| {
            &d.record_id == record_id
                && d.document.title == new_title
                && &d.document.content_version_id != content_version_id
        });

        match existing {
            Some(existing) => {
                // New version of the existing document; intake copy is discarded
                documents[existing].document.content_version_id = new_cv.clone();
                documents.remove(intake);
                Ok(new_cv)
            }
            None => {
                documents[intake].document.title = new_title.to_string();
                Ok(content_version_id.clone())
            }
        }
    }

    async fn create_or_rename(
        &self,
        content_version_id: &ContentVersionId,
        new_title: &str,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::CreateOrRename {
            content_version_id: content_version_id.clone(),
            new_title: new_title.to_string(),
        })
        .await?;

        let mut documents = self.documents.lock().await;
        let stored = documents
            .iter_mut()
            .find(|d| &d.document.content_version_id == content_version_id)
            .ok_or_else(|| {
                StoreError::not_found(
                    StoreOperation::CreateOrRename,
                    format!("content version {content_version_id} not found"),
                )
            })?;
        stored.document.title = new_title.to_string();
        Ok(())
    }

    async fn update_document_status(
        &self,
        content_version_id: &ContentVersionId,
        new_title: &str,
        status: &DocumentStatus,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::UpdateDocumentStatus {
            content_version_id: content_version_id.clone(),
            new_title: new_title.to_string(),
            status: status.clone(),
        })
        .await?;

        let mut documents = self.documents.lock().await;
        let stored = documents
            .iter_mut()
            .find(|d| &d.document.content_version_id == content_version_id)
            .ok_or_else(|| {
                StoreError::not_found(
                    StoreOperation::UpdateDocumentStatus,
                    format!("content version {content_version_id} not found"),
                )
            })?;
        stored.document.status = status.clone();
        Ok(())
    }

    async fn upload_file(
        &self,
        record_id: &RecordId,
        file_name: &str,
        base64_content: &str,
    ) -> Result<ContentVersionId, StoreError> {
        self.record(StoreCall::UploadFile {
            record_id: record_id.clone(),
            file_name: file_name.to_string(),
            base64_content: base64_content.to_string(),
        })
        .await?;

        Ok(self
            .insert(record_id.clone(), file_name, unreviewed())
            .await
            .content_version_id)
    }

    async fn is_checklist_required(
        &self,
        record_id: &RecordId,
        checklist_id: &str,
    ) -> Result<bool, StoreError> {
        self.record(StoreCall::CheckRequirement {
            record_id: record_id.clone(),
            checklist_id: checklist_id.to_string(),
        })
        .await?;
        Ok(self.required.load(Ordering::SeqCst))
    }
}

/// `NotificationSink` that keeps every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: parking_lot::Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.of_kind(NotificationKind::Error)
    }

    pub fn successes(&self) -> Vec<Notification> {
        self.of_kind(NotificationKind::Success)
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
    }

    fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

/// View model wired to in-memory collaborators
pub struct TestHarness {
    pub store: Arc<InMemoryDocumentStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub vm: Arc<ChecklistViewModel>,
}

impl TestHarness {
    /// Harness for a validated checklist against an empty record
    pub fn new(checklist: ValidatedChecklist) -> Self {
        Self::with_store(checklist, InMemoryDocumentStore::new())
    }

    pub fn with_store(checklist: ValidatedChecklist, store: InMemoryDocumentStore) -> Self {
        let store = Arc::new(store);
        let notifier = Arc::new(RecordingNotifier::new());
        let vm = Arc::new(ChecklistViewModel::new(
            checklist,
            TEST_RECORD,
            store.clone(),
            notifier.clone(),
        ));
        Self {
            store,
            notifier,
            vm,
        }
    }

    pub fn record_id(&self) -> RecordId {
        RecordId::from(TEST_RECORD)
    }
}

/// Built-in variant, validated under the strict policy
pub fn validated_variant(id: &str) -> ValidatedChecklist {
    let definition = variants::builtin(id).unwrap();
    DefinitionValidator::default().validate(definition).unwrap()
}

/// Harness for the physician checklist
pub fn physician_harness() -> TestHarness {
    TestHarness::new(validated_variant(variants::PHYSICIAN))
}

/// Harness for the full-cycle checklist
pub fn full_cycle_harness() -> TestHarness {
    TestHarness::new(validated_variant(variants::FULL_CYCLE))
}

/// Harness for the gated parking-agreement checklist
pub fn parking_agreement_harness() -> TestHarness {
    TestHarness::new(validated_variant(variants::PARKING_AGREEMENT))
}

/// Document row with a generated id pair
pub fn document(title: &str, status: DocumentStatus) -> Document {
    let suffix: String = title.chars().filter(char::is_ascii_alphanumeric).collect();
    Document::new(
        format!("069{suffix}"),
        title,
        status,
        format!("068{suffix}"),
    )
}
