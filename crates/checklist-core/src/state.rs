//! Derived checklist state
//!
//! Recomputed from scratch on every document load; never persisted.

use crate::matcher::resolve;
use crate::progress::{progress, Progress};
use crate::status::statuses;
use crate::types::{Document, DocumentStatus};
use crate::validation::ValidatedChecklist;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-slot view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    /// Slot key
    pub key: String,
    /// Display label
    pub label: String,
    /// Resolved status
    pub status: DocumentStatus,
    /// Bound document, if any
    pub document: Option<Document>,
}

/// Snapshot of a checklist against the store's documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistState {
    /// Checklist variant id
    pub checklist: String,
    /// False when a gated checklist is not required for the record
    pub required: bool,
    /// Slots in declaration order
    pub slots: IndexMap<String, SlotState>,
    /// Weighted completion
    pub progress: Progress,
}

impl ChecklistState {
    /// Resolve documents against a checklist
    #[must_use]
    pub fn compute(checklist: &ValidatedChecklist, documents: &[Document]) -> Self {
        let bindings = resolve(documents, &checklist.slots);
        let slot_statuses = statuses(&bindings);
        let progress = progress(&slot_statuses, &checklist.slots);

        let slots = checklist
            .slots
            .iter()
            .map(|slot| {
                let status = slot_statuses
                    .get(&slot.key)
                    .cloned()
                    .unwrap_or(DocumentStatus::NoFile);
                let state = SlotState {
                    key: slot.key.clone(),
                    label: slot.label.clone(),
                    status,
                    document: bindings.get(&slot.key).cloned(),
                };
                (slot.key.clone(), state)
            })
            .collect();

        Self {
            checklist: checklist.id.clone(),
            required: true,
            slots,
            progress,
        }
    }

    /// State of a gated checklist the record does not require
    #[must_use]
    pub fn not_required(checklist: &ValidatedChecklist) -> Self {
        let mut state = Self::compute(checklist, &[]);
        state.required = false;
        state
    }

    /// Status of one slot
    #[must_use]
    pub fn status(&self, key: &str) -> Option<&DocumentStatus> {
        self.slots.get(key).map(|s| &s.status)
    }

    /// Slot key → status, in slot order
    #[must_use]
    pub fn slot_statuses(&self) -> IndexMap<String, DocumentStatus> {
        self.slots
            .iter()
            .map(|(k, s)| (k.clone(), s.status.clone()))
            .collect()
    }

    /// Completion percentage
    #[inline]
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.progress.percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ChecklistDefinition, Slot};
    use crate::validation::DefinitionValidator;

    fn checklist() -> ValidatedChecklist {
        DefinitionValidator::default()
            .validate(ChecklistDefinition::new(
                "physician",
                "Physician",
                vec![
                    Slot::new("crmLicense", "CRM License", 50),
                    Slot::new("physicianCv", "Physician Cv", 50),
                ],
            ))
            .unwrap()
    }

    #[test]
    fn zero_documents_is_all_no_file() {
        let state = ChecklistState::compute(&checklist(), &[]);

        assert!(state.required);
        assert_eq!(state.percentage(), 0);
        assert!(state
            .slots
            .values()
            .all(|s| s.status == DocumentStatus::NoFile && s.document.is_none()));
    }

    #[test]
    fn compute_binds_documents() {
        let docs = vec![Document::new(
            "1",
            "CRM License_v2.pdf",
            DocumentStatus::Approved,
            "cv1",
        )];
        let state = ChecklistState::compute(&checklist(), &docs);

        assert_eq!(state.status("crmLicense"), Some(&DocumentStatus::Approved));
        assert_eq!(state.status("physicianCv"), Some(&DocumentStatus::NoFile));
        assert_eq!(state.percentage(), 50);
    }

    #[test]
    fn not_required_has_no_progress() {
        let state = ChecklistState::not_required(&checklist());
        assert!(!state.required);
        assert_eq!(state.percentage(), 0);
        assert_eq!(state.slots.len(), 2);
    }
}
