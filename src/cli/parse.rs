//! CLI parse: clap types for cascade. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cascade CLI - Cascading TOML configuration trees
#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Cascading TOML configuration trees", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Produce cascaded TOML (merge ancestors into leaves)
    Cascade {
        #[command(subcommand)]
        command: CascadeCommands,
    },
    /// Rewrite the TOML files in place
    Refactor {
        #[command(subcommand)]
        command: RefactorCommands,
    },
    /// Check that all TOML files parse and match the template value kinds
    Check {
        /// Path to a cascade root (where `.cascade.toml` lives)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Generate a table of all values encoded in the TOML files
    Tabulate {
        /// Path to a cascade root (where `.cascade.toml` lives)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Table style (simple, plain, grid, github, utf8) or csv
        #[arg(long, default_value = "simple")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum CascadeCommands {
    /// Produce cascaded TOML objects for each given path
    Files {
        /// Leaf files to cascade
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Cascade every leaf under a root and keep entries matching filters
    Filter {
        /// Path to a cascade root (where `.cascade.toml` lives)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// TOML fragments declaring acceptable values (e.g. 'color = "red"')
        filters: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum RefactorCommands {
    /// Move definitions common to all children into shared TOML files
    Coalesce {
        /// Path to a cascade root (where `.cascade.toml` lives)
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Rename a key in the template and every data file
    Rename {
        /// Current key name (must exist in the template)
        old_name: String,
        /// New key name
        new_name: String,
        /// Path to a cascade root (where `.cascade.toml` lives)
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}
