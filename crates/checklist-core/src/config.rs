//! Checklist definition files
//!
//! Definitions can be shipped as TOML or JSON next to the built-in variants:
//!
//! ```toml
//! weight_policy = "strict"
//!
//! [[checklists]]
//! id = "physician"
//! name = "Physician checklist"
//!
//! [[checklists.slots]]
//! key = "crmLicense"
//! label = "CRM License"
//! weight = 100
//! ```

use crate::definition::ChecklistDefinition;
use crate::error::ConfigError;
use crate::validation::{DefinitionValidator, ValidatedChecklist, WeightPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a definition file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionFile {
    /// Weight policy applied when validating this file's checklists
    #[serde(default)]
    pub weight_policy: WeightPolicy,
    /// Checklist tables
    #[serde(default)]
    pub checklists: Vec<ChecklistDefinition>,
}

impl DefinitionFile {
    /// Parse TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let mut file: Self =
            toml::from_str(input).map_err(|e| ConfigError::parse_error("<toml>", e))?;
        file.normalize();
        Ok(file)
    }

    /// Parse JSON
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let mut file: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::parse_error("<json>", e))?;
        file.normalize();
        Ok(file)
    }

    /// Read a `.toml` or `.json` file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` if the content or extension is not supported
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => {
                return Err(ConfigError::parse_error(
                    path,
                    format!("unsupported file extension: {other:?}"),
                ))
            }
        };

        // Re-attach the real path to parse errors
        let file = parsed.map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::parse_error(path, message),
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            checklists = file.checklists.len(),
            "loaded checklist definitions"
        );
        Ok(file)
    }

    /// Checklist by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ChecklistDefinition> {
        self.checklists.iter().find(|c| c.id == id)
    }

    /// Validator configured with this file's weight policy
    #[must_use]
    pub fn validator(&self) -> DefinitionValidator {
        DefinitionValidator::new(self.weight_policy)
    }

    /// Validate every checklist, stopping at the first error
    ///
    /// # Errors
    /// The first `ConfigError` encountered
    pub fn validate_all(&self) -> Result<Vec<ValidatedChecklist>, ConfigError> {
        let validator = self.validator();
        self.checklists
            .iter()
            .cloned()
            .map(|def| validator.validate(def))
            .collect()
    }

    /// Validate every checklist, reporting each outcome
    #[must_use]
    pub fn validate_each(&self) -> Vec<(String, Result<ValidatedChecklist, ConfigError>)> {
        let validator = self.validator();
        self.checklists
            .iter()
            .map(|def| (def.id.clone(), validator.validate(def.clone())))
            .collect()
    }

    fn normalize(&mut self) {
        for def in &mut self.checklists {
            def.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::MatchRule;

    const SAMPLE: &str = r#"
weight_policy = "lenient"

[[checklists]]
id = "parking"
gated = true

[[checklists.slots]]
key = "parkingAgreement"
label = "Parking Agreement Letter"
weight = 100
single_version = true

[[checklists]]
id = "tax"
name = "Tax forms"

[[checklists.slots]]
key = "w9"
label = "W9"
match_rule = "exact"
weight = 50

[[checklists.slots]]
key = "w92"
label = "W92 optional"
weight = 50
"#;

    #[test]
    fn parses_toml_with_defaults() {
        let file = DefinitionFile::from_toml_str(SAMPLE).unwrap();

        assert_eq!(file.weight_policy, WeightPolicy::Lenient);
        assert_eq!(file.checklists.len(), 2);

        let parking = file.find("parking").unwrap();
        assert!(parking.gated);
        assert_eq!(parking.name, "parking");
        assert_eq!(parking.slots[0].match_text, "Parking Agreement Letter");
        assert!(parking.slots[0].single_version);

        let tax = file.find("tax").unwrap();
        assert_eq!(tax.slots[0].match_rule, MatchRule::Exact);
        assert_eq!(tax.slots[1].match_rule, MatchRule::Substring);
    }

    #[test]
    fn validates_all_tables() {
        let file = DefinitionFile::from_toml_str(SAMPLE).unwrap();
        let validated = file.validate_all().unwrap();
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn parses_json() {
        let json = r#"{"checklists":[{"id":"one","slots":[{"key":"a","label":"Alpha","weight":100}]}]}"#;
        let file = DefinitionFile::from_json_str(json).unwrap();

        assert_eq!(file.weight_policy, WeightPolicy::Strict);
        assert_eq!(file.checklists[0].slots[0].match_text, "Alpha");
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = DefinitionFile::from_toml_str("checklists = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
