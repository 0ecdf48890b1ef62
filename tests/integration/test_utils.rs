//! Shared test utilities for integration tests

use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes DATAGEN_* environment variable access across tests
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// A catalog model: a single-keyed category that owns products, and a
/// product with a composite key.
pub const CATALOG_MODEL: &str = r#"
[interfaces]
module = "repository"
path = "repository/types_gen.rs"

[mapping]
module = "mapping"
path = "repository/mapping"
index_module = "catalog.mapping"

[[entities]]
name = "Category"
type_path = "crate::model::Category"
fields = [
    { name = "name", ty = "String", tags = "key" },
    { name = "description", ty = "String" },
]
capabilities = [
    { kind = "crud" },
    { kind = "search" },
    { kind = "search_predicates", predicates = [{ name = "name", label = "Name", operators = ["eq", "like"] }] },
]

[[entities]]
name = "Theme"
type_path = "crate::model::Theme"
fields = [{ name = "name", ty = "String", tags = "key" }]
capabilities = [{ kind = "crud", operations = ["find_by_key", "list_all"] }, { kind = "filter_keys" }]

[[entities]]
name = "Price"
type_path = "crate::model::Price"
fields = [
    { name = "sku", ty = "String", tags = "key" },
    { name = "region", ty = "String", tags = "key" },
    { name = "amount", ty = "i64" },
]
capabilities = [{ kind = "crud" }]
"#;

/// Temporary workspace holding a model file
pub struct Workspace {
    pub dir: TempDir,
    pub model: PathBuf,
}

impl Workspace {
    pub fn with_model(model: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, model).unwrap();
        Self { dir, model: path }
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative))
            .unwrap_or_else(|e| panic!("reading {relative}: {e}"))
    }
}
