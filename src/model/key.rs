//! Key classification: direct field type or synthesized composite.

use super::entity::Field;

/// How an entity's identity is expressed in generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStrategy {
    /// No key-tagged fields
    None,
    /// Exactly one key field, referenced by its own type
    Direct(Field),
    /// Two or more key fields aggregated into `type_name`, in declaration order
    Composite { type_name: String, fields: Vec<Field> },
}

impl KeyStrategy {
    pub(crate) fn resolve(entity: &str, fields: &[Field]) -> Self {
        let keys: Vec<Field> = fields.iter().filter(|f| f.tags.key).cloned().collect();
        match keys.as_slice() {
            [] => KeyStrategy::None,
            [single] => KeyStrategy::Direct(single.clone()),
            _ => KeyStrategy::Composite {
                type_name: format!("{entity}Key"),
                fields: keys,
            },
        }
    }

    pub fn key_count(&self) -> usize {
        match self {
            KeyStrategy::None => 0,
            KeyStrategy::Direct(_) => 1,
            KeyStrategy::Composite { fields, .. } => fields.len(),
        }
    }

    /// Short human-readable summary
    pub fn describe(&self) -> String {
        match self {
            KeyStrategy::None => "none".to_string(),
            KeyStrategy::Direct(field) => format!("{}: {}", field.name, field.ty),
            KeyStrategy::Composite { type_name, fields } => {
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                format!("{type_name}({})", names.join(", "))
            }
        }
    }

    pub(crate) fn declaration(&self, entity: &str) -> Option<String> {
        let KeyStrategy::Composite { type_name, fields } = self else {
            return None;
        };
        let body: Vec<String> = fields
            .iter()
            .map(|field| format!("    pub {}: {},", field.name, field.ty))
            .collect();
        Some(format!(
            "/// {type_name} is the key for {entity}\n\
             #[derive(Debug, Clone, PartialEq, Eq, Hash)]\n\
             pub struct {type_name} {{\n{}\n}}",
            body.join("\n")
        ))
    }
}
