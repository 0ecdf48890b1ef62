//! Configuration file and environment sources.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Name of the workspace config file
pub const WORKSPACE_FILE: &str = "datagen.toml";

fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    debug!(config_path = %path.display(), required, "Adding config source");
    builder.add_source(
        File::from(path)
            .format(FileFormat::Toml)
            .required(required),
    )
}

/// Add `datagen.toml` and `config/{DATAGEN_ENV}.toml` from the workspace root.
/// Both are optional.
pub fn add_workspace_files(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    let base = workspace_root.join(WORKSPACE_FILE);
    if base.exists() {
        builder = add_file(builder, &base, false);
    }

    if let Ok(env_name) = std::env::var("DATAGEN_ENV") {
        let env_file = workspace_root.join("config").join(format!("{env_name}.toml"));
        if env_file.exists() {
            builder = add_file(builder, &env_file, false);
        }
    }
    builder
}

/// Add a file named on the command line. It must exist.
pub fn add_explicit_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    Ok(add_file(builder, path, true))
}

/// `DATAGEN__OUTPUT__FILE_SUFFIX` and similar override every file
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(Environment::with_prefix("DATAGEN").separator("__"))
}
