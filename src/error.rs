//! Error types for the datagen generation engine.
//!
//! Generation is a build-time activity: none of these errors are recovered
//! locally. Rule bodies return them with `?` and the whole run aborts.

use std::path::PathBuf;
use thiserror::Error;

/// Capability bag lookup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Ambiguous capability {marker}: {count} markers qualify, expected at most one")]
    Ambiguous { marker: &'static str, count: usize },

    #[error("Missing required capability {marker} for {context}")]
    Missing { marker: &'static str, context: String },
}

/// Key metadata errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Entity {entity} has no key-tagged fields")]
    NoKeyFields { entity: String },

    #[error("Entity {entity} declares field {field} more than once")]
    DuplicateField { entity: String, field: String },

    #[error("{rule} only supports a single key on {entity}, found {found}")]
    SingleKeyRequired {
        entity: String,
        rule: &'static str,
        found: usize,
    },
}

/// Errors raised while composing or running a generation
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Path {0:?} exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Path {0:?} exists but is not a file")]
    NotAFile(PathBuf),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Descriptor {0} does not expose a module name")]
    MissingPackage(&'static str),

    #[error("Rule registered for {expected} received a different descriptor")]
    DescriptorMismatch { expected: &'static str },

    #[error("Build context slot '{slot}' was read before any rule bound it")]
    UnboundSlot { slot: String },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for GenError {
    fn from(err: config::ConfigError) -> Self {
        GenError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for GenError {
    fn from(err: toml::de::Error) -> Self {
        GenError::Model(err.to_string())
    }
}
