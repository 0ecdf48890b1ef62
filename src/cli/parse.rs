//! CLI parse: clap types for datagen. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Datagen CLI - rule-driven repository code generation
#[derive(Parser, Debug)]
#[command(name = "datagen")]
#[command(about = "Generate repository interfaces and storage-mapping scaffolding from a model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path, layered over datagen.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the interface file and mapping directory for a model
    Generate {
        /// Model document (TOML)
        #[arg(long)]
        model: PathBuf,
        /// Output root; overrides output.root from configuration
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show each entity's key strategy and capabilities
    Inspect {
        /// Model document (TOML)
        #[arg(long)]
        model: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Commands {
    /// Command name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Generate { .. } => "generate",
            Commands::Inspect { .. } => "inspect",
        }
    }
}
