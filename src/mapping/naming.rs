//! Derived identifiers and storage names for one entity.

use crate::error::GenError;
use crate::inflect::Inflector;
use crate::model::{Entity, MappingOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    pub struct_name: String,
    pub internal: String,
    pub implementation: String,
    pub params: String,
    pub ctor: String,
    /// Snake-case entity name, used to prefix association columns
    pub table_prefix: String,
    pub table_name: String,
    /// Code expression for the template's context scope
    pub context_scope: Option<String>,
}

impl Naming {
    pub fn of(entity: &Entity, inflector: &dyn Inflector) -> Result<Self, GenError> {
        let options = entity.capabilities().get::<MappingOptions>()?;
        let snake = inflector.snake(entity.name());
        let table_name = options
            .and_then(|o| o.table_name.clone())
            .unwrap_or_else(|| inflector.plural(&snake));

        Ok(Naming {
            struct_name: entity.name().to_string(),
            internal: entity.internal_name(),
            implementation: format!("{}Impl", entity.interface_name()),
            params: format!("{}Params", entity.interface_name()),
            ctor: format!("new_{snake}_repository"),
            table_prefix: snake,
            table_name,
            context_scope: options.and_then(|o| o.context_scope.clone()),
        })
    }

    /// Association table joining this entity (the owning side) to `child`
    pub fn association_table(&self, child: &Naming) -> String {
        format!("{}_{}", self.table_prefix, child.table_name)
    }

    /// Column in an association table holding this entity's key
    pub fn association_column(&self, key_field: &str, inflector: &dyn Inflector) -> String {
        format!("{}_{}", self.table_prefix, inflector.snake(key_field))
    }
}

/// `{module}::{item}`, or `item` alone when `module` is empty
pub fn qualify(module: &str, item: &str) -> String {
    if module.is_empty() {
        item.to_string()
    } else {
        format!("{module}::{item}")
    }
}
