//! Entity model: the data types code is generated for, their key metadata
//! and the capability markers rule packages react to.

mod document;
mod entity;
mod key;
mod markers;

pub use document::{CapabilitySpec, EntitySpec, FieldSpec, InterfacesSection, MappingSection, ModelDocument};
pub use entity::{Entity, EntityBuilder, Field, FieldTags};
pub use key::KeyStrategy;
pub use markers::{
    Associate, Crud, FilterKeys, ListByAssociatedKey, MappingOptions, Operation, Search,
    SearchPredicateEntry, SearchPredicates,
};
