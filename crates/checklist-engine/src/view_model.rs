//! Checklist view model
//!
//! Owns one validated checklist bound to one record. The only state kept is
//! the last installed [`ChecklistState`]; it is replaced wholesale by every
//! successful [`ChecklistViewModel::refresh`].

use crate::error::{ChecklistError, MalformedUploadError};
use crate::notify::{
    Notification, NotificationSink, INVALID_UPLOAD_TITLE, LOAD_ERROR_TITLE,
    REQUIREMENT_ERROR_TITLE,
};
use crate::store::DocumentStore;
use crate::types::{EngineConfig, FileHandle};
use crate::upload::{UploadOutcome, UploadWorkflow};
use checklist_core::{ChecklistDefinition, ChecklistState, RecordId, ValidatedChecklist};
use futures::future::join_all;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

#[derive(Default)]
struct Installed {
    ticket: u64,
    state: Option<Arc<ChecklistState>>,
}

/// Checklist bound to a record, store and notification sink
pub struct ChecklistViewModel {
    checklist: Arc<ValidatedChecklist>,
    record_id: RecordId,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn NotificationSink>,
    config: EngineConfig,
    installed: RwLock<Installed>,
    tickets: AtomicU64,
}

impl ChecklistViewModel {
    /// Create view model with the default engine configuration
    #[must_use]
    pub fn new(
        checklist: impl Into<Arc<ValidatedChecklist>>,
        record_id: impl Into<RecordId>,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            checklist: checklist.into(),
            record_id: record_id.into(),
            store,
            notifier,
            config: EngineConfig::default(),
            installed: RwLock::new(Installed::default()),
            tickets: AtomicU64::new(0),
        }
    }

    /// With engine configuration
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate a definition under `config` and build the view model
    ///
    /// # Errors
    /// `ChecklistError::Config` if the definition fails validation
    pub fn from_definition(
        definition: ChecklistDefinition,
        config: EngineConfig,
        record_id: impl Into<RecordId>,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ChecklistError> {
        let checklist = config.validate(definition)?;
        Ok(Self::new(checklist, record_id, store, notifier).with_config(config))
    }

    /// Checklist in use
    #[inline]
    #[must_use]
    pub fn checklist(&self) -> &ValidatedChecklist {
        &self.checklist
    }

    /// Record the checklist is evaluated for
    #[inline]
    #[must_use]
    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub(crate) fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    /// Last installed state; `None` before the first successful refresh
    #[must_use]
    pub fn state(&self) -> Option<Arc<ChecklistState>> {
        self.installed.read().state.clone()
    }

    /// Reload documents from the store and recompute the checklist
    ///
    /// On failure the previous state stays installed and one error
    /// notification is sent. A refresh that completes after a later one
    /// has already been installed returns its own result but does not
    /// replace the installed state.
    ///
    /// # Errors
    /// `ChecklistError::Store` if the requirement gate or document fetch fails
    pub async fn refresh(&self) -> Result<Arc<ChecklistState>, ChecklistError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::debug_span!(
            "refresh",
            checklist = %self.checklist.id,
            record = %self.record_id,
            ticket
        );

        async {
            match self.load().await {
                Ok(state) => {
                    let state = Arc::new(state);
                    self.install(ticket, Arc::clone(&state));
                    tracing::info!(
                        percentage = state.percentage(),
                        required = state.required,
                        "checklist refreshed"
                    );
                    Ok(state)
                }
                Err((title, err)) => {
                    tracing::warn!(error = %err, "refresh failed");
                    self.notifier
                        .notify(Notification::error(title, err.user_message()));
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn load(&self) -> Result<ChecklistState, (&'static str, ChecklistError)> {
        if self.checklist.gated {
            let required = self
                .store
                .is_checklist_required(&self.record_id, &self.checklist.id)
                .await
                .map_err(|e| (REQUIREMENT_ERROR_TITLE, ChecklistError::from(e)))?;
            if !required {
                return Ok(ChecklistState::not_required(&self.checklist));
            }
        }

        let documents = self
            .store
            .fetch_documents(&self.record_id)
            .await
            .map_err(|e| (LOAD_ERROR_TITLE, ChecklistError::from(e)))?;
        tracing::debug!(documents = documents.len(), "documents fetched");

        Ok(ChecklistState::compute(&self.checklist, &documents))
    }

    fn install(&self, ticket: u64, state: Arc<ChecklistState>) {
        let mut installed = self.installed.write();
        if ticket > installed.ticket {
            installed.ticket = ticket;
            installed.state = Some(state);
        } else {
            tracing::debug!(
                ticket,
                installed = installed.ticket,
                "discarding stale refresh"
            );
        }
    }

    /// Run one file through the upload workflow
    pub async fn handle_upload(&self, slot_key: &str, file: FileHandle) -> UploadOutcome {
        UploadWorkflow::new(self, slot_key, file).run().await
    }

    /// Run every file through its own workflow concurrently
    ///
    /// Outcomes are returned in input order; one file's failure does not
    /// affect the others.
    ///
    /// # Errors
    /// `MalformedUploadError::EmptyFileList` if `files` is empty
    pub async fn handle_upload_batch(
        &self,
        slot_key: &str,
        files: Vec<FileHandle>,
    ) -> Result<Vec<UploadOutcome>, ChecklistError> {
        self.check_batch(&files)?;
        let uploads = files
            .into_iter()
            .map(|file| self.handle_upload(slot_key, file));
        Ok(join_all(uploads).await)
    }

    /// Spawn one task per file and return without waiting
    ///
    /// # Errors
    /// `MalformedUploadError::EmptyFileList` if `files` is empty
    pub fn dispatch_upload_batch(
        self: &Arc<Self>,
        slot_key: &str,
        files: Vec<FileHandle>,
    ) -> Result<Vec<JoinHandle<UploadOutcome>>, ChecklistError> {
        self.check_batch(&files)?;
        let handles = files
            .into_iter()
            .map(|file| {
                let vm = Arc::clone(self);
                let slot_key = slot_key.to_string();
                tokio::spawn(async move { vm.handle_upload(&slot_key, file).await })
            })
            .collect();
        Ok(handles)
    }

    fn check_batch(&self, files: &[FileHandle]) -> Result<(), ChecklistError> {
        if files.is_empty() {
            let err = ChecklistError::from(MalformedUploadError::EmptyFileList);
            self.notifier
                .notify(Notification::error(INVALID_UPLOAD_TITLE, err.user_message()));
            return Err(err);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChecklistViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecklistViewModel")
            .field("checklist", &self.checklist.id)
            .field("record_id", &self.record_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
