//! Engine configuration and upload inputs

use checklist_core::{
    ChecklistDefinition, ConfigError, ContentVersionId, DefinitionValidator, ValidatedChecklist,
    WeightPolicy,
};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique upload identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UploadId(pub Ulid);

impl UploadId {
    /// Generate new upload ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accepted file extensions, with leading dot; empty accepts any
    pub accepted_extensions: Vec<String>,
    /// Weight policy for startup validation
    pub weight_policy: WeightPolicy,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With accepted extensions
    #[must_use]
    pub fn with_accepted_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// With weight policy
    #[inline]
    #[must_use]
    pub fn with_weight_policy(mut self, policy: WeightPolicy) -> Self {
        self.weight_policy = policy;
        self
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::parse_error("<engine config>", e))
    }

    /// Whether an extension (with leading dot) is accepted, ignoring case
    #[must_use]
    pub fn accepts(&self, extension: &str) -> bool {
        self.accepted_extensions.is_empty()
            || self
                .accepted_extensions
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }

    /// Validate a definition under this configuration's weight policy
    ///
    /// # Errors
    /// Any `ConfigError` raised by [`DefinitionValidator::validate`]
    pub fn validate(&self, definition: ChecklistDefinition) -> Result<ValidatedChecklist, ConfigError> {
        DefinitionValidator::new(self.weight_policy).validate(definition)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: [
                ".pdf", ".png", ".jpg", ".jpeg", ".doc", ".docx", ".xls", ".xlsx", ".txt", ".csv",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            weight_policy: WeightPolicy::Strict,
        }
    }
}

/// File delivered by the UI for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileHandle {
    /// Bytes already stored by a platform uploader
    Uploaded {
        /// Content version created by the uploader
        content_version_id: ContentVersionId,
        /// Original file name
        file_name: String,
    },
    /// Bytes held by the component itself
    Raw {
        /// Original file name
        file_name: String,
        /// File content
        bytes: Vec<u8>,
    },
}

impl FileHandle {
    /// Handle for a file a platform uploader already stored
    #[must_use]
    pub fn uploaded(content_version_id: impl Into<ContentVersionId>, file_name: impl Into<String>) -> Self {
        Self::Uploaded {
            content_version_id: content_version_id.into(),
            file_name: file_name.into(),
        }
    }

    /// Handle for raw bytes
    #[must_use]
    pub fn raw(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Raw {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Original file name
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Uploaded { file_name, .. } | Self::Raw { file_name, .. } => file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_common_formats_case_insensitively() {
        let config = EngineConfig::default();
        assert!(config.accepts(".pdf"));
        assert!(config.accepts(".JPEG"));
        assert!(!config.accepts(".exe"));
    }

    #[test]
    fn empty_list_accepts_anything() {
        let config = EngineConfig::new().with_accepted_extensions(Vec::<String>::new());
        assert!(config.accepts(".exe"));
    }

    #[test]
    fn parses_partial_toml() {
        let config = EngineConfig::from_toml_str("weight_policy = \"lenient\"").unwrap();
        assert_eq!(config.weight_policy, WeightPolicy::Lenient);
        assert_eq!(config.accepted_extensions, EngineConfig::default().accepted_extensions);
    }

    #[test]
    fn validate_uses_weight_policy() {
        let strict = EngineConfig::default();
        let lenient = EngineConfig::new().with_weight_policy(WeightPolicy::Lenient);

        assert!(strict.validate(checklist_core::variants::nuclear_cardiology()).is_err());
        assert!(lenient.validate(checklist_core::variants::nuclear_cardiology()).is_ok());
    }
}
