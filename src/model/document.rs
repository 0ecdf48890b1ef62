//! TOML model document
//!
//! Declares where generated code goes and which entities to generate it for.
//! Capabilities that point at another entity name it; [`ModelDocument::entities`]
//! resolves those names to the referenced entity's shape.

use super::entity::{Entity, FieldTags};
use super::markers::{
    Associate, Crud, FilterKeys, ListByAssociatedKey, MappingOptions, Operation, Search,
    SearchPredicateEntry, SearchPredicates,
};
use crate::capability::Capabilities;
use crate::error::GenError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub interfaces: InterfacesSection,
    #[serde(default)]
    pub mapping: Option<MappingSection>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

/// Where the repository traits are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfacesSection {
    pub module: String,
    /// File path, relative to the output root
    pub path: PathBuf,
    /// Path other modules use to reach the traits; defaults to `crate::{module}`
    #[serde(default)]
    pub module_path: Option<String>,
}

impl InterfacesSection {
    pub fn module_path(&self) -> String {
        self.module_path
            .clone()
            .unwrap_or_else(|| format!("crate::{}", self.module))
    }
}

/// Where the mapping scaffolding is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSection {
    pub module: String,
    /// Directory path, relative to the output root
    pub path: PathBuf,
    #[serde(default = "default_generate_index")]
    pub generate_index: bool,
    /// Module name of the index file; defaults to `module`
    #[serde(default)]
    pub index_module: Option<String>,
}

impl MappingSection {
    pub fn index_module(&self) -> &str {
        self.index_module.as_deref().unwrap_or(&self.module)
    }
}

fn default_generate_index() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    #[serde(default)]
    pub type_path: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub capabilities: Vec<CapabilitySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(alias = "type")]
    pub ty: String,
    #[serde(default)]
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapabilitySpec {
    Crud {
        #[serde(default)]
        operations: Option<Vec<Operation>>,
    },
    Search,
    Associate {
        child: String,
    },
    FilterKeys,
    ListByAssociatedKey {
        associated: String,
        #[serde(default)]
        reversed: bool,
    },
    Mapping {
        #[serde(default)]
        table_name: Option<String>,
        #[serde(default)]
        context_scope: Option<String>,
    },
    SearchPredicates {
        predicates: Vec<SearchPredicateEntry>,
    },
}

impl ModelDocument {
    pub fn from_toml_str(source: &str) -> Result<Self, GenError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        let doc = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), entities = doc.entities.len(), "Loaded model document");
        Ok(doc)
    }

    /// Build every entity, in document order, with its capabilities resolved.
    ///
    /// Referenced entities are shapes that keep only their storage-mapping
    /// overrides, so both sides of an association agree on table names.
    pub fn entities(&self) -> Result<Vec<Arc<Entity>>, GenError> {
        let mut shapes: HashMap<&str, Arc<Entity>> = HashMap::new();
        for spec in &self.entities {
            let shape = Arc::new(spec.build(spec.mapping_options())?);
            if shapes.insert(spec.name.as_str(), shape).is_some() {
                return Err(GenError::Model(format!(
                    "entity {} is declared more than once",
                    spec.name
                )));
            }
        }

        self.entities
            .iter()
            .map(|spec| {
                let capabilities = spec
                    .capabilities
                    .iter()
                    .try_fold(Capabilities::new(), |bag, cap| {
                        cap.attach(bag, &spec.name, &shapes)
                    })?;
                spec.build(capabilities).map(Arc::new)
            })
            .collect()
    }
}

impl EntitySpec {
    fn mapping_options(&self) -> Capabilities {
        self.capabilities
            .iter()
            .filter_map(|cap| match cap {
                CapabilitySpec::Mapping {
                    table_name,
                    context_scope,
                } => Some(MappingOptions {
                    table_name: table_name.clone(),
                    context_scope: context_scope.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    fn build(&self, capabilities: Capabilities) -> Result<Entity, GenError> {
        self.fields
            .iter()
            .fold(Entity::builder(&self.name, &self.type_path), |builder, field| {
                builder.field(&field.name, &field.ty, FieldTags::parse(&field.tags))
            })
            .capabilities(capabilities)
            .build()
    }
}

impl CapabilitySpec {
    /// One-line summary, e.g. `crud(find_by_key, list_all)` or `associate(Product)`
    pub fn describe(&self) -> String {
        match self {
            CapabilitySpec::Crud { operations: None } => "crud".to_string(),
            CapabilitySpec::Crud {
                operations: Some(ops),
            } => {
                let ops: Vec<String> = ops.iter().map(Operation::to_string).collect();
                format!("crud({})", ops.join(", "))
            }
            CapabilitySpec::Search => "search".to_string(),
            CapabilitySpec::Associate { child } => format!("associate({child})"),
            CapabilitySpec::FilterKeys => "filter_keys".to_string(),
            CapabilitySpec::ListByAssociatedKey {
                associated,
                reversed: false,
            } => format!("list_by_associated_key({associated})"),
            CapabilitySpec::ListByAssociatedKey {
                associated,
                reversed: true,
            } => format!("list_by_associated_key({associated}, reversed)"),
            CapabilitySpec::Mapping { table_name, .. } => match table_name {
                Some(table) => format!("mapping(table = {table})"),
                None => "mapping".to_string(),
            },
            CapabilitySpec::SearchPredicates { predicates } => {
                format!("search_predicates({})", predicates.len())
            }
        }
    }

    fn attach(
        &self,
        bag: Capabilities,
        owner: &str,
        shapes: &HashMap<&str, Arc<Entity>>,
    ) -> Result<Capabilities, GenError> {
        let resolve = |name: &str| {
            shapes.get(name).cloned().ok_or_else(|| {
                GenError::Model(format!("entity {owner} refers to unknown entity {name}"))
            })
        };

        Ok(match self {
            CapabilitySpec::Crud { operations } => bag.with(match operations {
                Some(ops) => Crud::with_operations(ops.iter().copied()),
                None => Crud::all(),
            }),
            CapabilitySpec::Search => bag.with(Search),
            CapabilitySpec::Associate { child } => bag.with(Associate {
                child: resolve(child)?,
            }),
            CapabilitySpec::FilterKeys => bag.with(FilterKeys),
            CapabilitySpec::ListByAssociatedKey {
                associated,
                reversed,
            } => bag.with(ListByAssociatedKey {
                associated: resolve(associated)?,
                reversed: *reversed,
            }),
            CapabilitySpec::Mapping {
                table_name,
                context_scope,
            } => bag.with(MappingOptions {
                table_name: table_name.clone(),
                context_scope: context_scope.clone(),
            }),
            CapabilitySpec::SearchPredicates { predicates } => {
                bag.with(SearchPredicates(predicates.clone()))
            }
        })
    }
}
