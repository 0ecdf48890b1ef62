//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_inspect_json, format_inspect_text, EntitySummary};
use crate::config::{ConfigLoader, GenConfig};
use crate::error::GenError;
use crate::generate::{GenerationReport, Generator};
use crate::model::ModelDocument;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Runtime context for CLI execution: workspace, loaded configuration, and
/// the generator the commands dispatch through.
pub struct RunContext {
    workspace_root: PathBuf,
    config: GenConfig,
    generator: Generator,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, GenError> {
        let config = ConfigLoader::load_with(&workspace_root, config_path.as_deref())?;
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: GenConfig) -> Self {
        Self {
            workspace_root,
            config,
            generator: Generator::default(),
        }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Output root for `generate`: `--out` when given, else `output.root`
    /// resolved against the workspace.
    pub fn output_root(&self, out: Option<&Path>) -> PathBuf {
        match out {
            Some(out) => out.to_path_buf(),
            None if self.config.output.root.is_absolute() => self.config.output.root.clone(),
            None => self.workspace_root.join(&self.config.output.root),
        }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, GenError> {
        let started = Instant::now();
        let result = match command {
            Commands::Generate { model, out } => self.handle_generate(model, out.as_deref()),
            Commands::Inspect { model, format } => self.handle_inspect(model, format),
        };
        match &result {
            Ok(_) => info!(
                command = command.name(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Command finished"
            ),
            Err(e) => warn!(command = command.name(), error = %e, "Command failed"),
        }
        result
    }

    fn handle_generate(&self, model: &Path, out: Option<&Path>) -> Result<String, GenError> {
        let doc = ModelDocument::load(model)?;
        let root = self.output_root(out);
        let report = self.generator.run(&doc, &self.config.output, &root)?;
        Ok(format_generation_report(&report))
    }

    fn handle_inspect(&self, model: &Path, format: &str) -> Result<String, GenError> {
        let doc = ModelDocument::load(model)?;
        let summaries = EntitySummary::collect(&doc)?;
        match format {
            "json" => format_inspect_json(&summaries),
            "text" => Ok(format_inspect_text(&summaries)),
            other => Err(GenError::Unsupported(format!(
                "output format '{other}' (must be 'text' or 'json')"
            ))),
        }
    }
}

fn format_generation_report(report: &GenerationReport) -> String {
    let mut lines = vec![format!(
        "Generated {} file(s) for {} entit{}:",
        report.files.len(),
        report.entities,
        if report.entities == 1 { "y" } else { "ies" }
    )];
    lines.extend(report.files.iter().map(|f| format!("  {}", f.display())));
    lines.join("\n")
}
