//! Checklist Core - document checklist resolution
//!
//! Correlates an unordered set of uploaded documents with a fixed table of
//! weighted document slots:
//! - Declarative checklist definitions and their startup validation
//! - Title-based matching of documents to slots
//! - Per-slot status and weighted progress
//! - Built-in variant tables and definition file loading
//!
//! # Example
//!
//! ```rust
//! use checklist_core::{variants, ChecklistState, DefinitionValidator, Document, DocumentStatus};
//!
//! let checklist = DefinitionValidator::default()
//!     .validate(variants::physician())
//!     .expect("built-in table is valid");
//!
//! let docs = vec![Document::new("069A", "CRM License.pdf", DocumentStatus::Approved, "068A")];
//! let state = ChecklistState::compute(&checklist, &docs);
//!
//! assert_eq!(state.percentage(), 25);
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod definition;
pub mod error;
pub mod matcher;
pub mod progress;
pub mod state;
pub mod status;
pub mod types;
pub mod validation;
pub mod variants;

pub use config::DefinitionFile;
pub use definition::{strip_extension, ChecklistDefinition, MatchRule, Slot};
pub use error::ConfigError;
pub use matcher::{resolve, Bindings};
pub use progress::{progress, Progress, ProgressHint};
pub use state::{ChecklistState, SlotState};
pub use status::{status_of, statuses};
pub use types::{ContentVersionId, Document, DocumentId, DocumentStatus, RecordId};
pub use validation::{DefinitionValidator, ValidatedChecklist, WeightPolicy, FULL_WEIGHT};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with checklists
    pub use crate::{
        ChecklistDefinition, ChecklistState, DefinitionValidator, Document, DocumentStatus,
        MatchRule, Progress, Slot, ValidatedChecklist, WeightPolicy,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
