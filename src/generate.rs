//! Generation driver
//!
//! Turns a [`ModelDocument`] into the repository interface file and, when the
//! document has a `[mapping]` section, the mapping directory. Every run
//! rewrites its output from scratch.

use crate::config::OutputConfig;
use crate::data::{self, Types};
use crate::engine::{Registry, WriteLog};
use crate::error::GenError;
use crate::mapping::{self, DirectoryMain};
use crate::model::ModelDocument;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

/// What a run wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub entities: usize,
    pub interface_file: PathBuf,
    pub mapping_dir: Option<PathBuf>,
    /// Every file written, in write order
    pub files: Vec<PathBuf>,
}

/// The two registries a run dispatches through
#[derive(Debug, Clone)]
pub struct Generator {
    data: Registry,
    mapping: Registry,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            data: data::registry(),
            mapping: mapping::registry(),
        }
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `registry` for the interface file, usually an extended clone of
    /// [`data::registry`]
    pub fn with_data_registry(mut self, registry: Registry) -> Self {
        self.data = registry;
        self
    }

    /// Use `registry` for the mapping directory, usually an extended clone of
    /// [`mapping::registry`]
    pub fn with_mapping_registry(mut self, registry: Registry) -> Self {
        self.mapping = registry;
        self
    }

    pub fn data_registry(&self) -> &Registry {
        &self.data
    }

    pub fn mapping_registry(&self) -> &Registry {
        &self.mapping
    }

    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn run(
        &self,
        doc: &ModelDocument,
        output: &OutputConfig,
        root: &Path,
    ) -> Result<GenerationReport, GenError> {
        let started = Instant::now();
        output
            .validate()
            .map_err(|e| GenError::Config(format!("output: {e}")))?;
        let entities = doc.entities()?;
        let header = output.header().map(str::to_string);

        let interface_file = root.join(&doc.interfaces.path);
        let directory = match &doc.mapping {
            Some(section) => {
                let main = DirectoryMain {
                    package: section.module.clone(),
                    interface_module: doc.interfaces.module_path(),
                    generate_index: section.generate_index,
                    index_module: section.index_module().to_string(),
                    file_suffix: output.file_suffix.clone(),
                    index_file: output.index_file.clone(),
                    header: header.clone(),
                    entities: entities.clone(),
                };
                main.check_files(self.mapping.inflector())?;
                Some((root.join(&section.path), main))
            }
            None => None,
        };

        let log = WriteLog::new();
        let mut types = Types::new(&doc.interfaces.module, entities.clone());
        types.header = header;
        self.data.recording(&log).emit_file_at(&interface_file, &types)?;

        let mapping_dir = match directory {
            Some((dir, main)) => {
                self.mapping.recording(&log).emit_directory_at(&dir, &main)?;
                Some(dir)
            }
            None => None,
        };
        let files = log.paths();

        info!(
            entities = entities.len(),
            files = files.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(GenerationReport {
            entities: entities.len(),
            interface_file,
            mapping_dir,
            files,
        })
    }
}

/// Run with the bundled registries
pub fn run(
    doc: &ModelDocument,
    output: &OutputConfig,
    root: &Path,
) -> Result<GenerationReport, GenError> {
    Generator::new().run(doc, output, root)
}
