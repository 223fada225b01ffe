//! Error types for the checklist engine
//!
//! Provides error handling for:
//! - Document store calls (fetch, save, rename, status update, intake)
//! - Malformed uploads (file names, empty batches, unknown slots)
//! - Upload state machine violations

use crate::upload::UploadState;
use checklist_core::ConfigError;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    /// External store call failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Upload rejected before reaching the store
    #[error("malformed upload: {0}")]
    MalformedUpload(#[from] MalformedUploadError),

    /// Checklist definition rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal state machine violation
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

impl ChecklistError {
    /// Whether re-triggering the same action could succeed
    ///
    /// The engine never retries on its own; this only informs the caller.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.kind == StoreErrorKind::Transport)
    }

    /// Message shown to the user in error notifications
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(e) => e.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Classification of store failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Network or service unavailable
    Transport,
    /// Caller lacks access
    Permission,
    /// Referenced record or content version does not exist
    NotFound,
    /// Store refused the operation
    Rejected,
}

/// Store operations, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `fetchDocuments`
    FetchDocuments,
    /// `saveNewVersion`
    SaveNewVersion,
    /// `createOrRename`
    CreateOrRename,
    /// `updateDocumentStatus`
    UpdateDocumentStatus,
    /// `uploadFile`
    UploadFile,
    /// Requirement gate lookup
    CheckRequirement,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FetchDocuments => "fetch documents",
            Self::SaveNewVersion => "save new version",
            Self::CreateOrRename => "create or rename",
            Self::UpdateDocumentStatus => "update document status",
            Self::UploadFile => "upload file",
            Self::CheckRequirement => "check requirement",
        };
        f.write_str(name)
    }
}

/// Failure reported by the document store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed ({kind:?}): {message}")]
pub struct StoreError {
    /// Operation that failed
    pub operation: StoreOperation,
    /// Failure class
    pub kind: StoreErrorKind,
    /// Store-provided message
    pub message: String,
}

impl StoreError {
    /// Create store error
    #[must_use]
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Transport failure
    #[must_use]
    pub fn transport(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Transport, message)
    }

    /// Permission failure
    #[must_use]
    pub fn permission(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Permission, message)
    }

    /// Missing record or content version
    #[must_use]
    pub fn not_found(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::NotFound, message)
    }
}

/// Upload rejected before any store call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedUploadError {
    /// File name has no usable extension
    #[error("file '{file_name}' has no extension")]
    MissingExtension {
        /// Uploaded file name
        file_name: String,
    },

    /// Extension not in the accepted list
    #[error("file '{file_name}' has unsupported extension '{extension}'")]
    UnsupportedExtension {
        /// Uploaded file name
        file_name: String,
        /// Extension with leading dot
        extension: String,
    },

    /// Batch contained no files
    #[error("no files to upload")]
    EmptyFileList,

    /// Upload control names a slot the checklist does not have
    #[error("unknown slot '{0}'")]
    UnknownSlot(String),

    /// Raw upload without bytes
    #[error("file '{file_name}' is empty")]
    EmptyContent {
        /// Uploaded file name
        file_name: String,
    },
}

/// Upload state machine violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Transition not in the allowed table
    #[error("illegal upload transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: UploadState,
        /// Requested state
        to: UploadState,
    },
}
