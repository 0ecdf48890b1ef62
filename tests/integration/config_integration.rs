//! Integration tests for configuration loading and the CLI run context

use super::test_utils::{Workspace, CATALOG_MODEL, ENV_MUTEX};
use datagen::cli::{Commands, RunContext};
use datagen::config::{ConfigLoader, WORKSPACE_FILE};
use datagen::GenError;
use std::path::PathBuf;

#[test]
fn test_workspace_file_drives_generation() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::with_model(CATALOG_MODEL);
    std::fs::write(
        ws.dir.path().join(WORKSPACE_FILE),
        r#"
[output]
root = "gen"
file_suffix = "_repo.rs"
header = "// catalog scaffolding"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let ctx = RunContext::new(ws.dir.path().to_path_buf(), None).unwrap();
    assert_eq!(ctx.config().logging.level, "debug");

    let output = ctx
        .execute(&Commands::Generate {
            model: ws.model.clone(),
            out: None,
        })
        .unwrap();
    assert!(output.contains("for 3 entities"));

    let theme = ws.read("gen/repository/mapping/theme_repo.rs");
    assert!(theme.starts_with("// catalog scaffolding\n// module: mapping\n"));
}

#[test]
fn test_environment_overrides_workspace_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::with_model(CATALOG_MODEL);
    std::fs::write(
        ws.dir.path().join(WORKSPACE_FILE),
        "[output]\nroot = \"from-file\"\n",
    )
    .unwrap();

    std::env::set_var("DATAGEN__OUTPUT__ROOT", "from-env");
    let result = ConfigLoader::load(ws.dir.path());
    std::env::remove_var("DATAGEN__OUTPUT__ROOT");

    assert_eq!(result.unwrap().output.root, PathBuf::from("from-env"));
}

#[test]
fn test_invalid_workspace_config_stops_the_run() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::with_model(CATALOG_MODEL);
    std::fs::write(
        ws.dir.path().join(WORKSPACE_FILE),
        "[output]\nfile_suffix = \"\"\n",
    )
    .unwrap();

    let err = RunContext::new(ws.dir.path().to_path_buf(), None)
        .err()
        .expect("empty suffix must be rejected");
    assert!(matches!(err, GenError::Config(msg) if msg.contains("file_suffix")));
}

#[test]
fn test_inspect_json_lists_every_entity() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::with_model(CATALOG_MODEL);
    let ctx = RunContext::new(ws.dir.path().to_path_buf(), None).unwrap();

    let json = ctx
        .execute(&Commands::Inspect {
            model: ws.model.clone(),
            format: "json".to_string(),
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Category", "Theme", "Price"]);
    assert_eq!(value[2]["key"], "PriceKey(sku, region)");
    assert_eq!(value[1]["capabilities"][0], "crud(find_by_key, list_all)");
}
