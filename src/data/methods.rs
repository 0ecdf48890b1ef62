//! Capability rule sets contributing repository trait methods.

use super::InterfaceMethods;
use crate::engine::{Key, RuleSet};
use crate::error::GenError;
use crate::model::{Associate, Crud, Entity, FilterKeys, ListByAssociatedKey, Operation, Search};

const CTX: &str = "ctx: &data::Context";

fn result(ok: &str) -> String {
    format!("Result<{ok}, data::Error>")
}

fn crud_methods(entity: &Entity, operation: Operation) -> Result<Vec<String>, GenError> {
    let ty = entity.type_path();
    Ok(match operation {
        Operation::FindByKey => {
            let key = entity.key_code(None)?;
            vec![
                format!("fn find_by_key(&self, {CTX}, key: &{key}) -> {}", result(ty)),
                format!("fn exists_by_key(&self, {CTX}, key: &{key}) -> {}", result("bool")),
            ]
        }
        Operation::ListAll => vec![format!(
            "fn list_all(&self, {CTX}, params: data::ListParams) -> {}",
            result(&format!("data::List<{ty}>"))
        )],
        Operation::Create => vec![format!(
            "fn create(&self, {CTX}, entity: &{ty}) -> {}",
            result("()")
        )],
        Operation::Update => vec![format!(
            "fn update(&self, {CTX}, entity: &{ty}) -> {}",
            result("()")
        )],
        Operation::Delete => {
            let key = entity.key_code(None)?;
            vec![
                format!("fn delete(&self, {CTX}, key: &{key}) -> {}", result("()")),
                format!(
                    "fn delete_entity(&self, {CTX}, entity: &{ty}) -> {}",
                    result("()")
                ),
            ]
        }
    })
}

/// One group of methods per supported CRUD operation
pub fn crud_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_fragment_rule(
        Key::<InterfaceMethods>::when(|m| m.entity.has::<Crud>()),
        |acc, _, methods| {
            let entity = &methods.entity;
            let crud = entity.capabilities().require::<Crud>(entity.name())?;
            let mut acc = acc;
            for operation in &crud.operations {
                acc = acc.extend(crud_methods(entity, *operation)?);
            }
            Ok(acc)
        },
    );
    rules
}

/// `search` and `search_predicates`
pub fn search_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_fragment_rule(
        Key::<InterfaceMethods>::when(|m| m.entity.has::<Search>()),
        |acc, _, methods| {
            let ty = methods.entity.type_path();
            Ok(acc
                .push(format!(
                    "fn search(&self, {CTX}, criteria: &[data::SearchPredicate], params: &data::PageParams) -> {}",
                    result(&format!("data::List<data::SearchResult<{ty}>>"))
                ))
                .push(format!(
                    "fn search_predicates(&self, {CTX}) -> {}",
                    result("Vec<data::SearchPredicateDescriptor>")
                )))
        },
    );
    rules
}

/// `associate_{children}` adding and removing child keys
pub fn associate_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_fragment_rule(
        Key::<InterfaceMethods>::when(|m| m.entity.has::<Associate>()),
        |acc, registry, methods| {
            let entity = &methods.entity;
            let inflector = registry.inflector();
            let key = entity.key_code(None)?;
            let mut acc = acc;
            for associate in entity.capabilities().get_all::<Associate>() {
                let child = &associate.child;
                let child_key = child.key_code(None)?;
                let name = inflector.snake(&inflector.plural(child.name()));
                acc = acc.push(format!(
                    "fn associate_{name}(&self, {CTX}, key: &{key}, add: &[{child_key}], remove: &[{child_key}]) -> {}",
                    result("()")
                ));
            }
            Ok(acc)
        },
    );
    rules
}

/// `filter_keys` returning the subset of keys that exist
pub fn filter_keys_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_fragment_rule(
        Key::<InterfaceMethods>::when(|m| m.entity.has::<FilterKeys>()),
        |acc, _, methods| {
            let key = methods.entity.key_code(None)?;
            Ok(acc.push(format!(
                "fn filter_keys(&self, {CTX}, keys: &[{key}]) -> {}",
                result(&format!("Vec<{key}>"))
            )))
        },
    );
    rules
}

/// `list_by_{associated}` for each associated entity
pub fn list_by_associated_key_rules() -> RuleSet {
    let rules = RuleSet::new();
    rules.add_fragment_rule(
        Key::<InterfaceMethods>::when(|m| m.entity.has::<ListByAssociatedKey>()),
        |acc, registry, methods| {
            let ty = methods.entity.type_path();
            let mut acc = acc;
            for list in methods.entity.capabilities().get_all::<ListByAssociatedKey>() {
                let associated = &list.associated;
                let key = associated.key_code(None)?;
                let name = registry.inflector().snake(associated.name());
                acc = acc.push(format!(
                    "fn list_by_{name}(&self, {CTX}, key: &{key}, params: data::ListParams) -> {}",
                    result(&format!("data::List<{ty}>"))
                ));
            }
            Ok(acc)
        },
    );
    rules
}
