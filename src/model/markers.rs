//! Capability markers understood by the bundled rule packages.
//!
//! Any `Debug + Send + Sync` type can be a marker; these are the ones the
//! `data` and `mapping` packages check for.

use super::entity::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// One create/read/update/delete operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FindByKey,
    ListAll,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::FindByKey,
        Operation::ListAll,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::FindByKey => "find_by_key",
            Operation::ListAll => "list_all",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Entity supports the listed CRUD operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crud {
    pub operations: BTreeSet<Operation>,
}

impl Crud {
    pub fn all() -> Self {
        Self::with_operations(Operation::ALL)
    }

    pub fn with_operations(operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

/// Entity supports free-text search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Search;

/// Entity is associated many-to-many with `child`
#[derive(Debug, Clone)]
pub struct Associate {
    pub child: Arc<Entity>,
}

/// Entity can be listed by a set of keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterKeys;

/// Entity can be listed by the key of an `associated` entity through their
/// association table. `reversed` means the table is named from the associated
/// side.
#[derive(Debug, Clone)]
pub struct ListByAssociatedKey {
    pub associated: Arc<Entity>,
    pub reversed: bool,
}

/// Storage-mapping overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingOptions {
    pub table_name: Option<String>,
    pub context_scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPredicateEntry {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub operators: Vec<String>,
}

/// Named search predicates exposed by a searchable entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPredicates(pub Vec<SearchPredicateEntry>);
