//! Rule package: repository interface declarations.
//!
//! Emits one `pub trait {Name}Repository` per entity into a single file. The
//! trait body is the fragment fold over [`InterfaceMethods`]; every capability
//! contributes its methods from its own [`RuleSet`], so packages can add
//! methods without touching the base rules.

mod methods;

pub use methods::{
    associate_rules, crud_rules, filter_keys_rules, list_by_associated_key_rules, search_rules,
};

use crate::code::Fragment;
use crate::engine::{Descriptor, Key, Registry, RuleSet};
use crate::model::Entity;
use std::sync::Arc;

/// Path of the runtime module generated code is written against
pub const RUNTIME: &str = "crate::data";

/// Every interface in one file
#[derive(Debug, Clone)]
pub struct Types {
    pub package: String,
    pub header: Option<String>,
    pub entities: Vec<Arc<Entity>>,
}

impl Types {
    pub fn new(package: impl Into<String>, entities: Vec<Arc<Entity>>) -> Self {
        Self {
            package: package.into(),
            header: None,
            entities,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

impl Descriptor for Types {
    fn package(&self) -> Option<&str> {
        Some(&self.package)
    }
}

/// The method list of one entity's repository trait
#[derive(Debug, Clone)]
pub struct InterfaceMethods {
    pub entity: Arc<Entity>,
}

impl Descriptor for InterfaceMethods {}

/// Composite key declarations and one trait per entity
pub fn base_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_file_rule(Key::<Types>::new(), |file, registry, types| {
        if let Some(header) = &types.header {
            file.set_header(header.as_str());
        }
        file.import(RUNTIME);

        for entity in &types.entities {
            if let Some(declaration) = entity.key_declaration() {
                file.add(declaration);
            }
            let methods = registry.build_fragment(
                Fragment::new(),
                &InterfaceMethods {
                    entity: Arc::clone(entity),
                },
            )?;
            file.add(render_trait(entity, &methods));
        }
        Ok(())
    });
    rules
}

fn render_trait(entity: &Entity, methods: &Fragment) -> String {
    let name = entity.interface_name();
    let doc = format!("/// {name} is a repository for the type {}", entity.name());
    if methods.is_empty() {
        return format!("{doc}\npub trait {name}: Send + Sync {{}}");
    }
    format!(
        "{doc}\npub trait {name}: Send + Sync {{\n{}\n}}",
        methods.render(4, ";")
    )
}

/// Base rules followed by every capability package, in that order
pub fn registry() -> Registry {
    let sets = [
        base_rules(),
        crud_rules(),
        search_rules(),
        associate_rules(),
        filter_keys_rules(),
        list_by_associated_key_rules(),
    ];
    let mut registry = Registry::new();
    registry.merge(&sets);
    registry
}
