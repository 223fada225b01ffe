//! Upload/rename workflow
//!
//! One isolated state machine per uploaded file:
//! `Received → TitleAssigned → Persisted → StatusPending → Reloaded`, or
//! `Failed` from any live state. A failed step stops the machine; nothing
//! is rolled back and no later step runs.

pub mod state;
pub mod title;

pub use state::{allowed_transitions, validate_transition, UploadState, UploadStateMachine};
pub use title::{canonical_title, file_extension};

use crate::error::{ChecklistError, MalformedUploadError};
use crate::notify::{
    Notification, INVALID_UPLOAD_TITLE, RENAME_ERROR_TITLE, STATUS_ERROR_TITLE,
    UPLOAD_ERROR_TITLE,
};
use crate::types::{FileHandle, UploadId};
use crate::view_model::ChecklistViewModel;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use checklist_core::{ContentVersionId, DocumentStatus, Slot};
use tracing::Instrument;

/// Successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Upload id
    pub upload_id: UploadId,
    /// Target slot
    pub slot_key: String,
    /// Original file name
    pub file_name: String,
    /// Canonical title assigned
    pub title: String,
    /// Content version now carrying the title
    pub content_version_id: ContentVersionId,
    /// Visited states, ending in `Reloaded`
    pub history: Vec<UploadState>,
}

/// Failed upload
#[derive(Debug, thiserror::Error)]
#[error("upload of '{file_name}' failed at {failed_at:?}: {source}")]
pub struct UploadFailure {
    /// Upload id
    pub upload_id: UploadId,
    /// Target slot
    pub slot_key: String,
    /// Original file name
    pub file_name: String,
    /// State the failing step started from
    pub failed_at: UploadState,
    /// Underlying error
    #[source]
    pub source: ChecklistError,
    /// Visited states, ending in `Failed`
    pub history: Vec<UploadState>,
}

/// Outcome of one file's upload
pub type UploadOutcome = Result<UploadReceipt, UploadFailure>;

/// Single upload in flight
pub(crate) struct UploadWorkflow<'a> {
    vm: &'a ChecklistViewModel,
    upload_id: UploadId,
    slot_key: String,
    file: FileHandle,
    machine: UploadStateMachine,
}

impl<'a> UploadWorkflow<'a> {
    pub(crate) fn new(vm: &'a ChecklistViewModel, slot_key: impl Into<String>, file: FileHandle) -> Self {
        Self {
            vm,
            upload_id: UploadId::new(),
            slot_key: slot_key.into(),
            file,
            machine: UploadStateMachine::new(),
        }
    }

    /// Drive the state machine to a terminal state
    pub(crate) async fn run(self) -> UploadOutcome {
        let span = tracing::info_span!(
            "upload",
            upload_id = %self.upload_id,
            slot = %self.slot_key,
            file = %self.file.file_name()
        );
        self.execute().instrument(span).await
    }

    async fn execute(mut self) -> UploadOutcome {
        // Received
        let Some(slot) = self.vm.checklist().slot(&self.slot_key).cloned() else {
            let err = MalformedUploadError::UnknownSlot(self.slot_key.clone());
            return Err(self.fail(err.into(), Some(INVALID_UPLOAD_TITLE)));
        };
        if let FileHandle::Raw { file_name, bytes } = &self.file {
            if bytes.is_empty() {
                let err = MalformedUploadError::EmptyContent {
                    file_name: file_name.clone(),
                };
                return Err(self.fail(err.into(), Some(INVALID_UPLOAD_TITLE)));
            }
        }

        // TitleAssigned
        let title = match canonical_title(&slot.label, self.file.file_name(), self.vm.config()) {
            Ok(title) => title,
            Err(err) => return Err(self.fail(err.into(), Some(INVALID_UPLOAD_TITLE))),
        };
        self.advance(UploadState::TitleAssigned)?;

        // Persisted
        let intake = self.intake(&title).await?;
        let content_version_id = self.persist(&slot, intake, &title).await?;
        self.advance(UploadState::Persisted)?;

        // StatusPending
        if let Err(err) = self
            .vm
            .store()
            .update_document_status(&content_version_id, &title, &DocumentStatus::Pending)
            .await
        {
            return Err(self.fail(err.into(), Some(STATUS_ERROR_TITLE)));
        }
        self.advance(UploadState::StatusPending)?;
        self.vm.notifier().notify(Notification::upload_succeeded());

        // Reloaded; refresh reports its own failures
        if let Err(err) = self.vm.refresh().await {
            return Err(self.fail(err, None));
        }
        self.advance(UploadState::Reloaded)?;

        tracing::info!(title = %title, "upload complete");
        Ok(UploadReceipt {
            upload_id: self.upload_id,
            slot_key: self.slot_key,
            file_name: self.file.file_name().to_string(),
            title,
            content_version_id,
            history: self.machine.history().to_vec(),
        })
    }

    /// Content version holding the uploaded bytes
    ///
    /// Raw bytes are stored under the canonical title, never the original
    /// file name, so a later failure cannot leave a document that matches
    /// another slot.
    async fn intake(&mut self, title: &str) -> Result<ContentVersionId, UploadFailure> {
        let encoded = match &self.file {
            FileHandle::Uploaded {
                content_version_id, ..
            } => return Ok(content_version_id.clone()),
            FileHandle::Raw { bytes, .. } => STANDARD.encode(bytes),
        };

        let vm = self.vm;
        vm.store()
            .upload_file(vm.record_id(), title, &encoded)
            .await
            .map_err(|err| self.fail(err.into(), Some(UPLOAD_ERROR_TITLE)))
    }

    /// Exactly one of `save_new_version` / `create_or_rename`
    async fn persist(
        &mut self,
        slot: &Slot,
        intake: ContentVersionId,
        title: &str,
    ) -> Result<ContentVersionId, UploadFailure> {
        let vm = self.vm;
        let store = vm.store();
        let persisted = if slot.single_version {
            store
                .save_new_version(&intake, title, vm.record_id())
                .await
        } else {
            store.create_or_rename(&intake, title).await.map(|()| intake)
        };

        persisted.map_err(|err| self.fail(err.into(), Some(RENAME_ERROR_TITLE)))
    }

    fn advance(&mut self, to: UploadState) -> Result<(), UploadFailure> {
        match self.machine.advance(to) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err.into(), Some(UPLOAD_ERROR_TITLE))),
        }
    }

    /// Stop the machine, notify once, and build the failure
    fn fail(&mut self, error: ChecklistError, notify_title: Option<&str>) -> UploadFailure {
        let failed_at = self.machine.fail();
        tracing::warn!(failed_at = ?failed_at, error = %error, "upload failed");

        if let Some(title) = notify_title {
            self.vm
                .notifier()
                .notify(Notification::error(title, error.user_message()));
        }

        UploadFailure {
            upload_id: self.upload_id,
            slot_key: self.slot_key.clone(),
            file_name: self.file.file_name().to_string(),
            failed_at,
            source: error,
            history: self.machine.history().to_vec(),
        }
    }
}
