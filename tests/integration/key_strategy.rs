//! Key-code generation through the bundled interface rules

use datagen::data::{self, Types};
use datagen::model::{Crud, Entity, FieldTags, KeyStrategy, Operation};
use datagen::{KeyError, SourceFile};
use std::sync::Arc;

#[test]
fn test_single_key_uses_field_type() {
    let theme = Entity::builder("Theme", "crate::model::Theme")
        .key_field("name", "String")
        .field("color", "String", FieldTags::default())
        .build()
        .unwrap();

    assert!(matches!(theme.key_strategy(), KeyStrategy::Direct(field) if field.name == "name"));
    assert_eq!(theme.key_code(None).unwrap(), "String");
    assert_eq!(theme.key_code(Some("crate::repository")).unwrap(), "String");
    assert_eq!(theme.key_declaration(), None);
}

#[test]
fn test_composite_key_keeps_declaration_order() {
    let price = Entity::builder("Price", "crate::model::Price")
        .key_field("sku", "String")
        .field("amount", "i64", FieldTags::default())
        .key_field("region", "String")
        .build()
        .unwrap();

    assert_eq!(price.key_code(None).unwrap(), "PriceKey");
    assert_eq!(
        price.key_code(Some("crate::repository")).unwrap(),
        "crate::repository::PriceKey"
    );
    let declaration = price.key_declaration().unwrap();
    let sku = declaration.find("pub sku: String,").unwrap();
    let region = declaration.find("pub region: String,").unwrap();
    assert!(sku < region);
    assert!(!declaration.contains("amount"));
}

#[test]
fn test_keyless_entity_fails_key_dependent_rules() {
    let log = Arc::new(
        Entity::builder("AuditLog", "crate::model::AuditLog")
            .field("message", "String", FieldTags::default())
            .capability(Crud::with_operations([Operation::FindByKey]))
            .build()
            .unwrap(),
    );
    assert!(matches!(
        log.key_code(None),
        Err(KeyError::NoKeyFields { entity }) if entity == "AuditLog"
    ));

    let mut file = SourceFile::new("repository");
    let err = data::registry()
        .emit_file(&mut file, &Types::new("repository", vec![log]))
        .unwrap_err();
    assert!(matches!(err, datagen::GenError::Key(KeyError::NoKeyFields { .. })));
}

#[test]
fn test_keyless_entity_without_key_methods_is_fine() {
    let log = Arc::new(
        Entity::builder("AuditLog", "crate::model::AuditLog")
            .field("message", "String", FieldTags::default())
            .capability(Crud::with_operations([Operation::ListAll, Operation::Create]))
            .build()
            .unwrap(),
    );
    let mut file = SourceFile::new("repository");
    data::registry()
        .emit_file(&mut file, &Types::new("repository", vec![log]))
        .unwrap();
    let rendered = file.render();
    assert!(rendered.contains("fn list_all(&self, ctx: &data::Context, params: data::ListParams)"));
    assert!(!rendered.contains("find_by_key"));
}

#[test]
fn test_composite_key_in_interface_file() {
    let price = Arc::new(
        Entity::builder("Price", "crate::model::Price")
            .key_field("sku", "String")
            .key_field("region", "String")
            .capability(Crud::all())
            .build()
            .unwrap(),
    );
    let mut file = SourceFile::new("repository");
    data::registry()
        .emit_file(&mut file, &Types::new("repository", vec![price]))
        .unwrap();

    assert!(file.items()[0].starts_with("/// PriceKey is the key for Price\n"));
    assert!(file.items()[1].contains("fn find_by_key(&self, ctx: &data::Context, key: &PriceKey)"));
    assert!(file.items()[1].contains("fn delete(&self, ctx: &data::Context, key: &PriceKey)"));
}
