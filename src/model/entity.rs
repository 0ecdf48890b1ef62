//! Entity descriptors.

use super::key::KeyStrategy;
use crate::capability::{Capabilities, Marker};
use crate::error::{GenError, KeyError};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Metadata tags on a field, parsed from a comma-separated list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldTags {
    pub key: bool,
}

impl FieldTags {
    /// Parse `"key"`, `"key,indexed"` and the like; unknown tags are ignored
    pub fn parse(tags: &str) -> Self {
        let mut parsed = FieldTags::default();
        for tag in tags.split(',').map(str::trim) {
            if tag == "key" {
                parsed.key = true;
            }
        }
        parsed
    }

    pub fn key() -> Self {
        FieldTags { key: true }
    }
}

/// A field of an entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub tags: FieldTags,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, tags: FieldTags) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            tags,
        }
    }
}

/// Descriptor of one data type: its fields, where the type lives and which
/// optional capabilities the generated code should support.
///
/// The key strategy is resolved on first use and cached, since many rules ask
/// for it while generating the same entity.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    type_path: String,
    fields: Vec<Field>,
    capabilities: Capabilities,
    key: OnceLock<KeyStrategy>,
}

impl Entity {
    pub fn builder(name: impl Into<String>, type_path: impl Into<String>) -> EntityBuilder {
        EntityBuilder {
            name: name.into(),
            type_path: type_path.into(),
            fields: Vec::new(),
            capabilities: Capabilities::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified path of the entity type in generated code
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn has<T: Marker>(&self) -> bool {
        self.capabilities.has::<T>()
    }

    pub fn interface_name(&self) -> String {
        format!("{}Repository", self.name)
    }

    pub fn internal_name(&self) -> String {
        format!("{}Internal", self.name)
    }

    pub fn key_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.tags.key)
    }

    pub fn key_strategy(&self) -> &KeyStrategy {
        self.key
            .get_or_init(|| KeyStrategy::resolve(&self.name, &self.fields))
    }

    /// Type expression for this entity's key.
    ///
    /// A single key field is referenced by its own type. A composite key is
    /// referenced by its synthesized name, qualified with `qualifier` when the
    /// consuming code lives in a different module from the declaration.
    pub fn key_code(&self, qualifier: Option<&str>) -> Result<String, KeyError> {
        match self.key_strategy() {
            KeyStrategy::None => Err(KeyError::NoKeyFields {
                entity: self.name.clone(),
            }),
            KeyStrategy::Direct(field) => Ok(field.ty.clone()),
            KeyStrategy::Composite { type_name, .. } => Ok(match qualifier {
                Some(module) if !module.is_empty() => format!("{module}::{type_name}"),
                _ => type_name.clone(),
            }),
        }
    }

    /// Declaration of the composite key type, if this entity needs one
    pub fn key_declaration(&self) -> Option<String> {
        self.key_strategy().declaration(&self.name)
    }

    /// The one key field, for rules that cannot handle composite keys
    pub fn single_key(&self, rule: &'static str) -> Result<&Field, KeyError> {
        match self.key_strategy() {
            KeyStrategy::Direct(field) => Ok(field),
            other => Err(KeyError::SingleKeyRequired {
                entity: self.name.clone(),
                rule,
                found: other.key_count(),
            }),
        }
    }

    /// This entity without capabilities, as referenced from another entity's
    /// markers
    pub fn shape(&self) -> Entity {
        Entity {
            name: self.name.clone(),
            type_path: self.type_path.clone(),
            fields: self.fields.clone(),
            capabilities: Capabilities::new(),
            key: self.key.clone(),
        }
    }
}

/// Builder for [`Entity`]
#[derive(Debug)]
pub struct EntityBuilder {
    name: String,
    type_path: String,
    fields: Vec<Field>,
    capabilities: Capabilities,
}

impl EntityBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>, tags: FieldTags) -> Self {
        self.fields.push(Field::new(name, ty, tags));
        self
    }

    pub fn key_field(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.field(name, ty, FieldTags::key())
    }

    pub fn capability<M: Marker>(mut self, marker: M) -> Self {
        self.capabilities = self.capabilities.with(marker);
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn build(self) -> Result<Entity, GenError> {
        if self.name.trim().is_empty() {
            return Err(GenError::Model("entity name must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(KeyError::DuplicateField {
                    entity: self.name.clone(),
                    field: field.name.clone(),
                }
                .into());
            }
        }
        let type_path = if self.type_path.is_empty() {
            self.name.clone()
        } else {
            self.type_path
        };
        Ok(Entity {
            name: self.name,
            type_path,
            fields: self.fields,
            capabilities: self.capabilities,
            key: OnceLock::new(),
        })
    }
}
