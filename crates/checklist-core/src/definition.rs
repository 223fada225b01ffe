//! Checklist definitions
//!
//! A checklist is a declarative table of weighted document slots. Every
//! variant (physician, full-cycle, parking, ...) is one instance of
//! [`ChecklistDefinition`] feeding the same engine.

use serde::{Deserialize, Serialize};

/// How a slot recognizes its document by title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Title contains the match text (case-sensitive)
    #[default]
    Substring,
    /// Title, minus its final extension, equals the match text
    Exact,
}

impl MatchRule {
    /// Test a title against match text under this rule
    #[must_use]
    pub fn matches(self, match_text: &str, title: &str) -> bool {
        match self {
            Self::Substring => title.contains(match_text),
            Self::Exact => strip_extension(title) == match_text,
        }
    }
}

/// Title without its final `.ext` suffix
#[must_use]
pub fn strip_extension(title: &str) -> &str {
    match title.rfind('.') {
        Some(idx) => &title[..idx],
        None => title,
    }
}

/// One weighted checklist requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Stable identifier, also the name of the UI control that uploads into it
    pub key: String,
    /// Display label; canonical titles are `{label}{extension}`
    pub label: String,
    /// Text searched for in document titles (defaults to the label)
    #[serde(default)]
    pub match_text: String,
    /// Matching rule
    #[serde(default)]
    pub match_rule: MatchRule,
    /// Contribution to progress when approved (0-100)
    pub weight: u8,
    /// Re-uploads replace the existing document's content
    #[serde(default)]
    pub single_version: bool,
}

impl Slot {
    /// Substring slot whose match text is its label
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, weight: u8) -> Self {
        let label = label.into();
        Self {
            key: key.into(),
            match_text: label.clone(),
            label,
            match_rule: MatchRule::Substring,
            weight,
            single_version: false,
        }
    }

    /// Override the match text
    #[must_use]
    pub fn with_match_text(mut self, text: impl Into<String>) -> Self {
        self.match_text = text.into();
        self
    }

    /// Override the match rule
    #[must_use]
    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.match_rule = rule;
        self
    }

    /// Mark as single-version
    #[must_use]
    pub fn single_version(mut self) -> Self {
        self.single_version = true;
        self
    }

    /// Whether a document title satisfies this slot
    #[inline]
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        self.match_rule.matches(&self.match_text, title)
    }

    /// Effective match text, falling back to the label when left empty by a config file
    fn normalize(&mut self) {
        if self.match_text.is_empty() {
            self.match_text = self.label.clone();
        }
    }
}

/// Declarative table of slots for one checklist variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistDefinition {
    /// Variant identifier
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Only shown when the store reports the record requires it
    #[serde(default)]
    pub gated: bool,
    /// Slots in display order
    pub slots: Vec<Slot>,
}

impl ChecklistDefinition {
    /// Create an ungated definition
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, slots: Vec<Slot>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gated: false,
            slots,
        }
    }

    /// Mark as gated on the record's requirement flag
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    /// Look up a slot by key
    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.key == key)
    }

    /// Sum of all slot weights
    #[must_use]
    pub fn weight_sum(&self) -> u32 {
        self.slots.iter().map(|s| u32::from(s.weight)).sum()
    }

    /// Fill defaults omitted by hand-written config files
    pub(crate) fn normalize(&mut self) {
        if self.name.is_empty() {
            self.name = self.id.clone();
        }
        for slot in &mut self.slots {
            slot.normalize();
        }
    }
}
