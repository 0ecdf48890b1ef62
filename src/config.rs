//! Configuration System
//!
//! Where generated files go and how they are named, plus logging. Sources are
//! layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `datagen.toml` in the workspace root
//! 3. `config/{DATAGEN_ENV}.toml` in the workspace root
//! 4. A file passed with `--config`
//! 5. `DATAGEN__*` environment variables (`DATAGEN__OUTPUT__ROOT=out`)

use crate::error::GenError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod defaults;
mod sources;

pub use defaults::{DEFAULT_FILE_SUFFIX, DEFAULT_HEADER, DEFAULT_INDEX_FILE};
pub use sources::WORKSPACE_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Generated output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root that model paths are resolved against
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Suffix of per-entity mapping files
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Name of the mapping index file
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// First line of every generated file; empty for none
    #[serde(default = "default_header")]
    pub header: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_suffix() -> String {
    DEFAULT_FILE_SUFFIX.to_string()
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            file_suffix: default_file_suffix(),
            index_file: default_index_file(),
            header: default_header(),
        }
    }
}

impl OutputConfig {
    pub fn header(&self) -> Option<&str> {
        Some(self.header.as_str()).filter(|h| !h.is_empty())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.file_suffix.is_empty() {
            return Err("file_suffix cannot be empty".to_string());
        }
        if !self.index_file.ends_with(".rs") {
            return Err(format!(
                "index_file must be a .rs file, got '{}'",
                self.index_file
            ));
        }
        if self.index_file.contains('/') || self.index_file.contains('\\') {
            return Err(format!(
                "index_file must be a file name, got '{}'",
                self.index_file
            ));
        }
        Ok(())
    }
}

impl GenConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        self.output
            .validate()
            .map_err(|e| GenError::Config(format!("output: {e}")))
    }
}

/// Loads [`GenConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the workspace files and environment
    pub fn load(workspace_root: &Path) -> Result<GenConfig, GenError> {
        Self::load_with(workspace_root, None)
    }

    /// Load with an optional explicit file layered over the workspace files
    pub fn load_with(workspace_root: &Path, explicit: Option<&Path>) -> Result<GenConfig, GenError> {
        let mut builder = defaults::builder_with_defaults()?;
        builder = sources::add_workspace_files(builder, workspace_root);
        if let Some(path) = explicit {
            builder = sources::add_explicit_file(builder, path)?;
        }
        builder = sources::add_environment(builder);

        let config: GenConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            root = %config.output.root.display(),
            file_suffix = %config.output.file_suffix,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load a single file over the defaults, ignoring workspace and environment
    pub fn load_from_file(path: &Path) -> Result<GenConfig, GenError> {
        let builder = sources::add_explicit_file(defaults::builder_with_defaults()?, path)?;
        let config: GenConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
