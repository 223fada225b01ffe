//! Progress aggregator
//!
//! Weighted completion over approved slots. The weight table is used as
//! authored: a table that does not sum to 100 shows its raw sum so the
//! misconfiguration stays visible.

use crate::definition::Slot;
use crate::types::DocumentStatus;
use crate::validation::FULL_WEIGHT;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation hint for the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressHint {
    /// All weight approved
    Complete,
    /// Anything less
    InProgress,
}

impl ProgressHint {
    /// Stable name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::InProgress => "in-progress",
        }
    }

    /// Bar fill color
    #[must_use]
    pub fn bar_color(self) -> &'static str {
        match self {
            Self::Complete => "#0056b3",
            Self::InProgress => "lightblue",
        }
    }
}

impl fmt::Display for ProgressHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Completion in percent, 0-100
    pub percentage: u8,
    /// Presentation hint, never used for business decisions
    pub hint: ProgressHint,
}

impl Progress {
    /// Progress with nothing approved
    #[must_use]
    pub fn zero() -> Self {
        Self::from_percentage(0)
    }

    fn from_percentage(percentage: u8) -> Self {
        let hint = if u32::from(percentage) == FULL_WEIGHT {
            ProgressHint::Complete
        } else {
            ProgressHint::InProgress
        };
        Self { percentage, hint }
    }

    /// Inline style for a progress bar
    #[must_use]
    pub fn bar_style(&self) -> String {
        format!(
            "width: {}%; background-color: {};",
            self.percentage,
            self.hint.bar_color()
        )
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::zero()
    }
}

/// Compute progress from slot statuses
///
/// Slots missing from `statuses` count as not approved.
#[must_use]
pub fn progress(statuses: &IndexMap<String, DocumentStatus>, slots: &[Slot]) -> Progress {
    let approved: u32 = slots
        .iter()
        .filter(|slot| statuses.get(&slot.key).is_some_and(DocumentStatus::is_approved))
        .map(|slot| u32::from(slot.weight))
        .sum();

    let clamped = approved.min(FULL_WEIGHT);
    // clamped <= 100
    Progress::from_percentage(u8::try_from(clamped).unwrap_or(u8::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn statuses(entries: &[(&str, DocumentStatus)]) -> IndexMap<String, DocumentStatus> {
        entries
            .iter()
            .map(|(k, s)| ((*k).to_string(), s.clone()))
            .collect()
    }

    #[test]
    fn sums_approved_weights_only() {
        let slots = vec![
            Slot::new("a", "Alpha", 25),
            Slot::new("b", "Beta", 25),
            Slot::new("c", "Gamma", 50),
        ];
        let st = statuses(&[
            ("a", DocumentStatus::Approved),
            ("b", DocumentStatus::Pending),
            ("c", DocumentStatus::Approved),
        ]);

        let p = progress(&st, &slots);
        assert_eq!(p.percentage, 75);
        assert_eq!(p.hint, ProgressHint::InProgress);
    }

    #[test]
    fn full_approval_is_complete() {
        let slots = vec![Slot::new("a", "Alpha", 33), Slot::new("b", "Beta", 67)];
        let st = statuses(&[
            ("a", DocumentStatus::Approved),
            ("b", DocumentStatus::Approved),
        ]);

        let p = progress(&st, &slots);
        assert_eq!(p, Progress { percentage: 100, hint: ProgressHint::Complete });
        assert_eq!(p.bar_style(), "width: 100%; background-color: #0056b3;");
    }

    #[test]
    fn short_table_is_not_renormalized() {
        let slots = vec![
            Slot::new("a", "Alpha", 6),
            Slot::new("b", "Beta", 6),
            Slot::new("c", "Gamma", 6),
        ];
        let st = statuses(&[
            ("a", DocumentStatus::Approved),
            ("b", DocumentStatus::Approved),
            ("c", DocumentStatus::Approved),
        ]);

        assert_eq!(progress(&st, &slots).percentage, 18);
    }

    #[test]
    fn overweight_table_is_clamped() {
        let slots = vec![Slot::new("a", "Alpha", 60), Slot::new("b", "Beta", 60)];
        let st = statuses(&[
            ("a", DocumentStatus::Approved),
            ("b", DocumentStatus::Approved),
        ]);

        assert_eq!(progress(&st, &slots).percentage, 100);
    }

    #[test]
    fn missing_status_counts_as_not_approved() {
        let slots = vec![Slot::new("a", "Alpha", 100)];
        assert_eq!(progress(&IndexMap::new(), &slots), Progress::zero());
    }
}
