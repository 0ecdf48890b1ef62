//! Defaults applied beneath every other configuration source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub const DEFAULT_FILE_SUFFIX: &str = "_gen.rs";
pub const DEFAULT_INDEX_FILE: &str = "index_gen.rs";
pub const DEFAULT_HEADER: &str = "// Code generated by datagen. DO NOT EDIT.";

/// Create a Config builder with the output defaults set.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("output.root", ".")?
        .set_default("output.file_suffix", DEFAULT_FILE_SUFFIX)?
        .set_default("output.index_file", DEFAULT_INDEX_FILE)?
        .set_default("output.header", DEFAULT_HEADER)
}
