//! Startup validation of checklist definitions
//!
//! A [`ValidatedChecklist`] can only be produced by [`DefinitionValidator`],
//! so everything downstream (matcher, upload workflow, view model) works on
//! tables that already passed the uniqueness and weight checks.

use crate::definition::{ChecklistDefinition, Slot};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;

/// Extension appended to labels when probing for ambiguous rules
const PROBE_EXTENSION: &str = ".pdf";

/// Full weight of a well-formed checklist
pub const FULL_WEIGHT: u32 = 100;

/// What to do with a weight table that does not sum to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPolicy {
    /// Reject the table
    #[default]
    Strict,
    /// Accept the table and log a warning; progress shows the raw sum
    Lenient,
}

/// Checklist definition that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedChecklist {
    definition: ChecklistDefinition,
}

impl ValidatedChecklist {
    /// Underlying definition
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &ChecklistDefinition {
        &self.definition
    }

    /// Consume into the underlying definition
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> ChecklistDefinition {
        self.definition
    }
}

impl Deref for ValidatedChecklist {
    type Target = ChecklistDefinition;

    fn deref(&self) -> &Self::Target {
        &self.definition
    }
}

/// Validator for checklist tables
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionValidator {
    policy: WeightPolicy,
}

impl DefinitionValidator {
    /// Create validator with a weight policy
    #[inline]
    #[must_use]
    pub fn new(policy: WeightPolicy) -> Self {
        Self { policy }
    }

    /// Active weight policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> WeightPolicy {
        self.policy
    }

    /// Validate a definition
    ///
    /// # Errors
    /// - `ConfigError::EmptyChecklist` if there are no slots
    /// - `ConfigError::DuplicateSlotKey` if two slots share a key
    /// - `ConfigError::EmptyMatchText` if a slot would match any title
    /// - `ConfigError::LabelDoesNotMatch` if canonical titles would not bind back
    /// - `ConfigError::AmbiguousMatch` if a canonical title satisfies two slots
    /// - `ConfigError::WeightOutOfRange` / `ConfigError::WeightSumMismatch`
    pub fn validate(
        &self,
        definition: ChecklistDefinition,
    ) -> Result<ValidatedChecklist, ConfigError> {
        let checklist = definition.id.clone();

        if definition.slots.is_empty() {
            return Err(ConfigError::EmptyChecklist { checklist });
        }

        let mut keys = HashSet::with_capacity(definition.slots.len());
        for slot in &definition.slots {
            if !keys.insert(slot.key.as_str()) {
                return Err(ConfigError::DuplicateSlotKey {
                    checklist,
                    key: slot.key.clone(),
                });
            }
            Self::validate_slot(&checklist, slot)?;
        }

        Self::check_ambiguity(&checklist, &definition.slots)?;
        self.check_weights(&definition)?;

        tracing::debug!(
            checklist = %checklist,
            slots = definition.slots.len(),
            "checklist definition validated"
        );

        Ok(ValidatedChecklist { definition })
    }

    fn validate_slot(checklist: &str, slot: &Slot) -> Result<(), ConfigError> {
        if slot.match_text.is_empty() {
            return Err(ConfigError::EmptyMatchText {
                checklist: checklist.to_string(),
                key: slot.key.clone(),
            });
        }
        if u32::from(slot.weight) > FULL_WEIGHT {
            return Err(ConfigError::WeightOutOfRange {
                checklist: checklist.to_string(),
                key: slot.key.clone(),
                weight: slot.weight,
            });
        }
        if !slot.matches(&sample_title(slot)) {
            return Err(ConfigError::LabelDoesNotMatch {
                checklist: checklist.to_string(),
                key: slot.key.clone(),
                label: slot.label.clone(),
            });
        }
        Ok(())
    }

    /// Every canonical title must satisfy exactly one slot
    ///
    /// O(n²) in the number of slots; tables stay small.
    fn check_ambiguity(checklist: &str, slots: &[Slot]) -> Result<(), ConfigError> {
        for owner in slots {
            let title = sample_title(owner);
            if let Some(other) = slots
                .iter()
                .find(|other| other.key != owner.key && other.matches(&title))
            {
                return Err(ConfigError::AmbiguousMatch {
                    checklist: checklist.to_string(),
                    owner: owner.key.clone(),
                    label: owner.label.clone(),
                    other: other.key.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_weights(&self, definition: &ChecklistDefinition) -> Result<(), ConfigError> {
        let sum = definition.weight_sum();
        if sum == FULL_WEIGHT {
            return Ok(());
        }
        match self.policy {
            WeightPolicy::Strict => Err(ConfigError::WeightSumMismatch {
                checklist: definition.id.clone(),
                sum,
            }),
            WeightPolicy::Lenient => {
                tracing::warn!(
                    checklist = %definition.id,
                    sum,
                    "checklist weights do not sum to 100; progress will show the raw sum"
                );
                Ok(())
            }
        }
    }
}

fn sample_title(slot: &Slot) -> String {
    format!("{}{}", slot.label, PROBE_EXTENSION)
}
