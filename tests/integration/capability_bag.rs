//! Capability bag lookups as rule predicates see them

use datagen::model::{Associate, Crud, Entity, FilterKeys, Operation, Search};
use datagen::{Capabilities, CapabilityError};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Audited {
    table: &'static str,
}

fn child(name: &str) -> Arc<Entity> {
    Arc::new(
        Entity::builder(name, format!("crate::model::{name}"))
            .key_field("id", "u64")
            .build()
            .unwrap(),
    )
}

#[test]
fn test_two_markers_of_one_type_are_ambiguous() {
    let bag = Capabilities::new()
        .with(Audited { table: "orders" })
        .with(Audited { table: "lines" });

    let err = bag.get::<Audited>().unwrap_err();
    assert_eq!(
        err,
        CapabilityError::Ambiguous {
            marker: std::any::type_name::<Audited>(),
            count: 2
        }
    );

    let lines = bag
        .get_matching::<Audited, _>(|a| a.table == "lines")
        .unwrap()
        .unwrap();
    assert_eq!(lines, &Audited { table: "lines" });
}

#[test]
fn test_get_all_preserves_insertion_order() {
    let bag = Capabilities::new()
        .with(Associate { child: child("Product") })
        .with(Search)
        .with(Associate { child: child("Theme") });

    let children: Vec<&str> = bag
        .get_all::<Associate>()
        .into_iter()
        .map(|a| a.child.name())
        .collect();
    assert_eq!(children, vec!["Product", "Theme"]);
    assert_eq!(bag.len(), 3);
}

#[test]
fn test_absent_marker() {
    let bag = Capabilities::new().with(Search);
    assert!(!bag.has::<FilterKeys>());
    assert_eq!(bag.get::<FilterKeys>().unwrap(), None);
    assert!(matches!(
        bag.require::<FilterKeys>("CategoryRepository"),
        Err(CapabilityError::Missing { context, .. }) if context == "CategoryRepository"
    ));
}

#[test]
fn test_entity_exposes_its_bag() {
    let entity = Entity::builder("Category", "crate::model::Category")
        .key_field("name", "String")
        .capability(Crud::with_operations([Operation::FindByKey]))
        .capability(Search)
        .build()
        .unwrap();

    assert!(entity.has::<Crud>());
    assert!(entity.has::<Search>());
    let crud = entity.capabilities().require::<Crud>(entity.name()).unwrap();
    assert!(crud.supports(Operation::FindByKey));
    assert!(!crud.supports(Operation::Delete));
}
