//! Checklist Engine - document checklist view model
//!
//! Drives a validated checklist against an external document store:
//! 1. **Refresh**: reload documents and recompute slot statuses and progress
//! 2. **Upload**: assign the canonical title, persist, reset to PENDING, reload
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use checklist_engine::prelude::*;
//!
//! let vm = ChecklistViewModel::from_definition(
//!     variants::physician(),
//!     EngineConfig::default(),
//!     "001A",
//!     store,
//!     Arc::new(TracingNotifier),
//! )?;
//!
//! vm.refresh().await?;
//! vm.handle_upload("physicianCv", FileHandle::uploaded("068B", "photo.jpeg")).await?;
//! ```

pub mod error;
pub mod notify;
pub mod store;
pub mod types;
pub mod upload;
pub mod view_model;

pub use error::{
    ChecklistError, MalformedUploadError, StoreError, StoreErrorKind, StoreOperation,
    WorkflowError,
};
pub use notify::{Notification, NotificationKind, NotificationSink, TracingNotifier};
pub use store::DocumentStore;
pub use types::{EngineConfig, FileHandle, UploadId};
pub use upload::{UploadFailure, UploadOutcome, UploadReceipt, UploadState};
pub use view_model::ChecklistViewModel;

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::{
        ChecklistError, ChecklistViewModel, DocumentStore, EngineConfig, FileHandle,
        Notification, NotificationSink, StoreError, TracingNotifier, UploadOutcome, UploadState,
    };
    pub use checklist_core::prelude::*;
    pub use checklist_core::variants;
}
