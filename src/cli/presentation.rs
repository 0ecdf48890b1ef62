//! CLI presentation: text and json formatters for `inspect`.

use crate::error::GenError;
use crate::model::ModelDocument;
use comfy_table::Table;
use serde::Serialize;

/// One row of `datagen inspect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub name: String,
    pub type_path: String,
    pub key: String,
    pub capabilities: Vec<String>,
}

impl EntitySummary {
    /// Summaries in document order. Resolves the document first so broken
    /// references are reported instead of listed.
    pub fn collect(doc: &ModelDocument) -> Result<Vec<Self>, GenError> {
        let entities = doc.entities()?;
        Ok(entities
            .iter()
            .zip(&doc.entities)
            .map(|(entity, spec)| Self {
                name: entity.name().to_string(),
                type_path: entity.type_path().to_string(),
                key: entity.key_strategy().describe(),
                capabilities: spec.capabilities.iter().map(|c| c.describe()).collect(),
            })
            .collect())
    }
}

pub fn format_inspect_text(summaries: &[EntitySummary]) -> String {
    if summaries.is_empty() {
        return "No entities declared.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Entity", "Type", "Key", "Capabilities"]);
    for s in summaries {
        let capabilities = if s.capabilities.is_empty() {
            "-".to_string()
        } else {
            s.capabilities.join("\n")
        };
        table.add_row(vec![&s.name, &s.type_path, &s.key, &capabilities]);
    }
    table.to_string()
}

pub fn format_inspect_json(summaries: &[EntitySummary]) -> Result<String, GenError> {
    serde_json::to_string_pretty(summaries)
        .map_err(|e| GenError::Unsupported(format!("json output: {e}")))
}
