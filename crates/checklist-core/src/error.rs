//! Error types for checklist definitions
//!
//! Every variant here is a configuration error: it is meant to be raised
//! once at startup, never while documents are being resolved.

use std::path::PathBuf;

/// Checklist definition is unusable
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Definition has no slots
    #[error("checklist '{checklist}' has no slots")]
    EmptyChecklist {
        /// Checklist id
        checklist: String,
    },

    /// Two slots share a key
    #[error("checklist '{checklist}' declares slot key '{key}' more than once")]
    DuplicateSlotKey {
        /// Checklist id
        checklist: String,
        /// Repeated slot key
        key: String,
    },

    /// Slot would match every title
    #[error("slot '{key}' in checklist '{checklist}' has empty match text")]
    EmptyMatchText {
        /// Checklist id
        checklist: String,
        /// Offending slot
        key: String,
    },

    /// Canonical titles produced for a slot would not bind back to it
    #[error("slot '{key}': label '{label}' does not satisfy its own match rule")]
    LabelDoesNotMatch {
        /// Checklist id
        checklist: String,
        /// Offending slot
        key: String,
        /// Label used for canonical titles
        label: String,
    },

    /// A canonical title for one slot also satisfies another slot's rule
    #[error("titles for slot '{owner}' ('{label}') also match slot '{other}'")]
    AmbiguousMatch {
        /// Checklist id
        checklist: String,
        /// Slot whose canonical title is ambiguous
        owner: String,
        /// Label of `owner`
        label: String,
        /// Slot that also matches
        other: String,
    },

    /// Single weight above 100
    #[error("slot '{key}' weight {weight} exceeds 100")]
    WeightOutOfRange {
        /// Checklist id
        checklist: String,
        /// Offending slot
        key: String,
        /// Declared weight
        weight: u8,
    },

    /// Weights do not add up to 100
    #[error("checklist '{checklist}' weights sum to {sum}, expected 100")]
    WeightSumMismatch {
        /// Checklist id
        checklist: String,
        /// Actual sum
        sum: u32,
    },

    /// No built-in or loaded checklist with this id
    #[error("unknown checklist variant: '{0}'")]
    UnknownVariant(String),

    /// Definition file could not be decoded
    #[error("invalid definition file {path}: {message}")]
    Parse {
        /// Definition file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Definition file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Definition file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Checklist the error belongs to, when it concerns a single table
    #[must_use]
    pub fn checklist(&self) -> Option<&str> {
        match self {
            Self::EmptyChecklist { checklist }
            | Self::DuplicateSlotKey { checklist, .. }
            | Self::EmptyMatchText { checklist, .. }
            | Self::LabelDoesNotMatch { checklist, .. }
            | Self::AmbiguousMatch { checklist, .. }
            | Self::WeightOutOfRange { checklist, .. }
            | Self::WeightSumMismatch { checklist, .. } => Some(checklist),
            Self::UnknownVariant(_) | Self::Parse { .. } | Self::Io { .. } => None,
        }
    }

    /// Create parse error for path
    pub fn parse_error(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
