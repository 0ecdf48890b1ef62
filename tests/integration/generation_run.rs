//! End-to-end generation from a model document

use super::test_utils::{Workspace, CATALOG_MODEL};
use datagen::config::OutputConfig;
use datagen::engine::EmissionTier;
use datagen::mapping::{self, InternalFields, InternalFunctions};
use datagen::model::ModelDocument;
use datagen::{GenError, Generator, Key, RuleSet};
use std::path::PathBuf;

#[test]
fn test_catalog_generation() {
    let ws = Workspace::with_model(CATALOG_MODEL);
    let doc = ModelDocument::load(&ws.model).unwrap();

    let report = Generator::new()
        .run(&doc, &OutputConfig::default(), ws.dir.path())
        .unwrap();

    assert_eq!(report.entities, 3);
    let relative: Vec<PathBuf> = report
        .files
        .iter()
        .map(|f| f.strip_prefix(ws.dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        relative,
        vec![
            PathBuf::from("repository/types_gen.rs"),
            PathBuf::from("repository/mapping/category_gen.rs"),
            PathBuf::from("repository/mapping/theme_gen.rs"),
            PathBuf::from("repository/mapping/price_gen.rs"),
            PathBuf::from("repository/mapping/index_gen.rs"),
        ]
    );

    let types = ws.read("repository/types_gen.rs");
    assert!(types.contains("pub trait CategoryRepository: Send + Sync {"));
    assert!(types.contains("fn search(&self, ctx: &data::Context"));
    assert!(types.contains("/// PriceKey is the key for Price"));
    let theme_trait = &types[types.find("pub trait ThemeRepository").unwrap()..];
    assert!(theme_trait.contains("fn find_by_key(&self, ctx: &data::Context, key: &String)"));
    assert!(!theme_trait[..theme_trait.find('}').unwrap()].contains("fn delete"));

    let category = ws.read("repository/mapping/category_gen.rs");
    assert!(category.contains("table: \"categories\","));
    assert!(category.contains("find_column: Some(\"categories.name\"),"));
    assert!(category.contains(r#"data::SearchPredicateDescriptor::new("name", "Name", &["eq", "like"]),"#));

    let price = ws.read("repository/mapping/price_gen.rs");
    assert!(price.contains(
        "pub crud_template: data::mapping::CrudTemplate<crate::model::Price, PriceInternal, crate::repository::PriceKey>,"
    ));
    assert!(price.contains("find_column: None,"));

    let index = ws.read("repository/mapping/index_gen.rs");
    let positions: Vec<usize> = [
        "new_category_repository",
        "new_theme_repository",
        "new_price_repository",
    ]
    .iter()
    .map(|ctor| index.find(ctor).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(index.contains("Module::new(\"catalog.mapping\")"));
}

#[test]
fn test_tenant_field_on_one_entity_via_extended_clone() {
    let ws = Workspace::with_model(CATALOG_MODEL);
    let doc = ModelDocument::load(&ws.model).unwrap();

    let tenant = RuleSet::new();
    tenant
        .add_fragment_rule(
            Key::<InternalFields>::when(|d| d.entity.name() == "Theme"),
            |acc, _, _| Ok(acc.push("pub tenant_id: String")),
        )
        .add_file_rule(
            Key::<InternalFunctions>::when(|d| d.entity.name() == "Theme"),
            |file, _, _| {
                file.add("impl ThemeInternal {\n    pub fn set_tenant_id(&mut self, id: String) {\n        self.tenant_id = id;\n    }\n}");
                Ok(())
            },
        );
    let base = mapping::registry();
    let generator = Generator::new().with_mapping_registry(base.clone().with_rules(&tenant));

    generator
        .run(&doc, &OutputConfig::default(), ws.dir.path())
        .unwrap();

    let theme = ws.read("repository/mapping/theme_gen.rs");
    assert!(theme.contains("pub tenant_id: String,"));
    assert!(theme.contains("pub fn set_tenant_id(&mut self, id: String)"));
    assert!(theme.contains("ThemeInternal { inner: m, ..Default::default() }"));

    let category = ws.read("repository/mapping/category_gen.rs");
    assert!(!category.contains("tenant_id"));
    assert!(category.contains("CategoryInternal { inner: m }"));

    assert_eq!(base.rule_count::<InternalFields>(EmissionTier::Fragment), 0);
    assert_eq!(
        generator
            .mapping_registry()
            .rule_count::<InternalFields>(EmissionTier::Fragment),
        1
    );
}

#[test]
fn test_custom_header_and_suffix() {
    let ws = Workspace::with_model(CATALOG_MODEL);
    let doc = ModelDocument::load(&ws.model).unwrap();
    let output = OutputConfig {
        file_suffix: ".rs".to_string(),
        index_file: "mod.rs".to_string(),
        header: String::new(),
        ..OutputConfig::default()
    };

    Generator::new().run(&doc, &output, ws.dir.path()).unwrap();

    let theme = ws.read("repository/mapping/theme.rs");
    assert!(theme.starts_with("// module: mapping\n"));
    assert!(ws.dir.path().join("repository/mapping/mod.rs").is_file());
}

#[test]
fn test_mapping_path_occupied_by_file_fails() {
    let ws = Workspace::with_model(CATALOG_MODEL);
    std::fs::create_dir_all(ws.dir.path().join("repository")).unwrap();
    std::fs::write(ws.dir.path().join("repository/mapping"), "occupied").unwrap();
    let doc = ModelDocument::load(&ws.model).unwrap();

    let err = Generator::new()
        .run(&doc, &OutputConfig::default(), ws.dir.path())
        .unwrap_err();
    assert!(matches!(err, GenError::NotADirectory(_)));
    // The interface file is written before the mapping directory
    assert!(ws.dir.path().join("repository/types_gen.rs").is_file());
}

#[test]
fn test_single_key_rule_rejects_composite_key() {
    let model = CATALOG_MODEL.replace(
        r#"capabilities = [{ kind = "crud" }]"#,
        r#"capabilities = [{ kind = "crud" }, { kind = "filter_keys" }]"#,
    );
    let ws = Workspace::with_model(&model);
    let doc = ModelDocument::load(&ws.model).unwrap();

    let err = Generator::new()
        .run(&doc, &OutputConfig::default(), ws.dir.path())
        .unwrap_err();
    assert!(matches!(
        err,
        GenError::Key(datagen::KeyError::SingleKeyRequired { found: 2, .. })
    ));
}

const ASSOCIATION_MODEL: &str = r#"
[interfaces]
module = "repository"
path = "repository/types_gen.rs"

[mapping]
module = "mapping"
path = "repository/mapping"

[[entities]]
name = "Product"
type_path = "crate::model::Product"
fields = [{ name = "sku", ty = "String", tags = "key" }]
capabilities = [{ kind = "crud" }, { kind = "associate", child = "Category" }]

[[entities]]
name = "Category"
type_path = "crate::model::Category"
fields = [{ name = "name", ty = "String", tags = "key" }]
capabilities = [
    { kind = "mapping", table_name = "cats" },
    { kind = "list_by_associated_key", associated = "Product", reversed = true },
]
"#;

#[test]
fn test_both_sides_of_association_share_one_table() {
    let ws = Workspace::with_model(ASSOCIATION_MODEL);
    let doc = ModelDocument::load(&ws.model).unwrap();

    Generator::new()
        .run(&doc, &OutputConfig::default(), ws.dir.path())
        .unwrap();

    let product = ws.read("repository/mapping/product_gen.rs");
    assert!(product.contains("association_table: \"product_cats\","));
    assert!(product.contains("child_column_name: \"category_name\","));

    let category = ws.read("repository/mapping/category_gen.rs");
    assert!(category.contains("INNER JOIN product_cats ON product_cats.category_name = cats.name"));
    assert!(category.contains("product_cats.product_sku = ?"));
    assert!(!category.contains("product_categories"));
}
