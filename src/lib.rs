//! Datagen: Rule-Driven Repository Code Generation
//!
//! Generation rules are registered against the type of descriptor they
//! handle and dispatched in three tiers (directory, file, fragment). The
//! bundled `data` and `mapping` rule packages turn a model of entities and
//! their capabilities into repository interfaces and storage-mapping
//! scaffolding.

pub mod capability;
pub mod cli;
pub mod code;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod generate;
pub mod inflect;
pub mod logging;
pub mod mapping;
pub mod model;

pub use capability::{Capabilities, Marker};
pub use code::{Fragment, SourceFile};
pub use engine::{Descriptor, EmissionTier, Key, Registry, RuleSet};
pub use error::{CapabilityError, GenError, KeyError};
pub use generate::{GenerationReport, Generator};
pub use inflect::{DefaultInflector, Inflector};
