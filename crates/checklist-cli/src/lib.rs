//! Command implementations for the `checklist` binary

pub mod store;

use anyhow::{bail, Context, Result};
use checklist_core::{
    variants, ChecklistDefinition, ChecklistState, ConfigError, DefinitionFile, DefinitionValidator,
    ValidatedChecklist, WeightPolicy,
};
use checklist_engine::{ChecklistViewModel, EngineConfig, TracingNotifier};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use store::JsonFileStore;

/// Record id used for offline evaluation
pub const OFFLINE_RECORD: &str = "offline";

/// Where a checklist definition comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSource {
    /// Built-in variant id
    Variant(String),
    /// TOML or JSON definition file, optionally narrowed to one checklist
    File {
        /// Definition file
        path: PathBuf,
        /// Checklist id within the file
        checklist: Option<String>,
    },
}

/// One line of `checklist variants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSummary {
    /// Variant id
    pub id: String,
    /// Display name
    pub name: String,
    /// Number of slots
    pub slots: usize,
    /// Sum of slot weights
    pub weight_sum: u32,
    /// Whether the record must require the checklist
    pub gated: bool,
}

/// Built-in variants in declaration order
#[must_use]
pub fn list_variants() -> Vec<VariantSummary> {
    variants::all_builtin()
        .into_iter()
        .map(|def| VariantSummary {
            weight_sum: def.weight_sum(),
            slots: def.slots.len(),
            gated: def.gated,
            name: def.name,
            id: def.id,
        })
        .collect()
}

/// Plain-text table of variants
#[must_use]
pub fn render_variants(summaries: &[VariantSummary]) -> String {
    let width = summaries.iter().map(|s| s.id.len()).max().unwrap_or(0);
    summaries
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {:>2} slots  weight {:>3}{}  {}\n",
                s.id,
                s.slots,
                s.weight_sum,
                if s.gated { "  gated" } else { "" },
                s.name,
            )
        })
        .collect()
}

/// Outcome of validating one checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationEntry {
    /// Checklist id
    pub id: String,
    /// Validation error, if any
    pub error: Option<String>,
}

/// Outcome of `checklist validate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Per-checklist outcomes
    pub entries: Vec<ValidationEntry>,
}

impl ValidationReport {
    /// Whether every checklist validated
    #[must_use]
    pub fn passed(&self) -> bool {
        self.entries.iter().all(|e| e.error.is_none())
    }

    /// One line per checklist
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match &entry.error {
                None => format!("ok      {}\n", entry.id),
                Some(err) => format!("invalid {}: {err}\n", entry.id),
            })
            .collect()
    }
}

/// Validate a source, or every built-in variant when `source` is `None`
///
/// `lenient` overrides the weight policy a definition file declares.
///
/// # Errors
/// Unknown variant, unreadable or unparsable definition file
pub fn validate(source: Option<&DefinitionSource>, lenient: bool) -> Result<ValidationReport> {
    let results: Vec<(String, Result<ValidatedChecklist, ConfigError>)> = match source {
        None => {
            let validator = DefinitionValidator::new(policy(lenient, WeightPolicy::Strict));
            variants::all_builtin()
                .into_iter()
                .map(|def| (def.id.clone(), validator.validate(def)))
                .collect()
        }
        Some(DefinitionSource::Variant(id)) => {
            let def = variants::builtin(id)?;
            let validator = DefinitionValidator::new(policy(lenient, WeightPolicy::Strict));
            vec![(def.id.clone(), validator.validate(def))]
        }
        Some(DefinitionSource::File { path, checklist }) => {
            let mut file = DefinitionFile::load(path)?;
            file.weight_policy = policy(lenient, file.weight_policy);
            if let Some(id) = checklist {
                file.checklists.retain(|c| &c.id == id);
                if file.checklists.is_empty() {
                    bail!("checklist '{id}' not found in {}", path.display());
                }
            }
            file.validate_each()
        }
    };

    let entries = results
        .into_iter()
        .map(|(id, result)| ValidationEntry {
            id,
            error: result.err().map(|e| e.to_string()),
        })
        .collect();
    Ok(ValidationReport { entries })
}

/// Resolve and validate a single checklist
///
/// # Errors
/// Unknown variant or checklist id, ambiguous file, or failed validation
pub fn load_checklist(source: &DefinitionSource, lenient: bool) -> Result<ValidatedChecklist> {
    let (definition, file_policy) = match source {
        DefinitionSource::Variant(id) => (variants::builtin(id)?, WeightPolicy::Strict),
        DefinitionSource::File { path, checklist } => {
            let file = DefinitionFile::load(path)?;
            let definition = select(&file, checklist.as_deref())
                .with_context(|| format!("in {}", path.display()))?;
            (definition, file.weight_policy)
        }
    };

    let id = definition.id.clone();
    let checklist = DefinitionValidator::new(policy(lenient, file_policy))
        .validate(definition)
        .with_context(|| format!("checklist '{id}' is invalid"))?;
    Ok(checklist)
}

fn select(file: &DefinitionFile, id: Option<&str>) -> Result<ChecklistDefinition> {
    match (id, file.checklists.as_slice()) {
        (Some(id), _) => file
            .find(id)
            .cloned()
            .with_context(|| format!("checklist '{id}' not found")),
        (None, [only]) => Ok(only.clone()),
        (None, []) => bail!("no checklists defined"),
        (None, _) => bail!("several checklists defined; pick one with --checklist"),
    }
}

fn policy(lenient: bool, declared: WeightPolicy) -> WeightPolicy {
    if lenient {
        WeightPolicy::Lenient
    } else {
        declared
    }
}

/// Evaluate a checklist against a JSON document export
///
/// # Errors
/// Definition errors, or an unreadable document export
pub async fn status(
    source: &DefinitionSource,
    documents: impl Into<PathBuf>,
    lenient: bool,
) -> Result<Arc<ChecklistState>> {
    let checklist = load_checklist(source, lenient)?;
    let store = JsonFileStore::new(documents);
    tracing::debug!(path = %store.path().display(), "reading document export");

    let config = EngineConfig::new().with_weight_policy(policy(lenient, WeightPolicy::Strict));
    let vm = ChecklistViewModel::new(
        checklist,
        OFFLINE_RECORD,
        Arc::new(store),
        Arc::new(TracingNotifier),
    )
    .with_config(config);

    Ok(vm.refresh().await?)
}

/// Plain-text rendering of a checklist state
#[must_use]
pub fn render_status(state: &ChecklistState) -> String {
    let key_width = state.slots.keys().map(String::len).max().unwrap_or(0);
    let label_width = state.slots.values().map(|s| s.label.len()).max().unwrap_or(0);

    let mut out = format!("{}\n", state.checklist);
    if !state.required {
        out.push_str("  not required for this record\n");
    }
    for slot in state.slots.values() {
        let title = slot.document.as_ref().map_or("", |d| d.title.as_str());
        out.push_str(&format!(
            "  {:<key_width$}  {:<label_width$}  {:<8}  {}\n",
            slot.key,
            slot.label,
            slot.status.as_str(),
            title
        ));
    }
    out.push_str(&format!(
        "progress {}% ({})\n",
        state.progress.percentage,
        state.progress.hint.as_str()
    ));
    out
}
