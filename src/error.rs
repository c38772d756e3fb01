//! Error types for the cascade configuration system.

use std::path::PathBuf;
use thiserror::Error;

/// Tree-structure errors: the root-marker/template contract is violated.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("No cascade root found for {0}")]
    MissingRoot(PathBuf),

    #[error("No template found in {0}")]
    MissingTemplate(PathBuf),

    #[error("Multiple templates found in {0} ({1} candidates, only one supported)")]
    AmbiguousTemplate(PathBuf, usize),

    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Document load/parse errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
}

/// Path-template compilation errors
#[derive(Debug, Error)]
#[error("Invalid path template '{template}': {reason}")]
pub struct PatternError {
    pub template: String,
    pub reason: String,
}

/// Root marker loading errors
#[derive(Debug, Error)]
pub enum RootError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Root marker {path} is invalid: {reason}")]
    InvalidMarker { path: PathBuf, reason: String },
}

/// Cascade engine errors. Per-target problems (missing root, missing
/// template, unparseable target) are diagnostics, not errors; only
/// foundational failures surface here.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error(transparent)]
    Root(#[from] RootError),

    #[error("Error parsing ancestor file {path}: {source}")]
    AncestorParse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("Failed to read ancestor file {path}: {source}")]
    AncestorIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Filter engine errors
#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("Invalid filter fragment '{fragment}': {source}")]
    Predicate {
        fragment: String,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Checker errors (the per-file findings are data, not errors)
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coalescer errors
#[derive(Debug, Error)]
pub enum CoalesceError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Schema refactor errors
#[derive(Debug, Error)]
pub enum RefactorError {
    #[error("Key '{key}' not present in template {template}")]
    KeyNotInTemplate { key: String, template: PathBuf },

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tabulator errors
#[derive(Debug, Error)]
pub enum TabulateError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Root(#[from] RootError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Unsupported table format '{0}'")]
    UnknownFormat(String),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log directive: {0}")]
    Directive(String),

    #[error("Invalid log format: {0} (must be 'json' or 'text')")]
    Format(String),
}

/// Top-level CLI error: one variant per command domain. Conversion to
/// process exit codes happens in the CLI output layer only.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Coalesce(#[from] CoalesceError),

    #[error(transparent)]
    Refactor(#[from] RefactorError),

    #[error(transparent)]
    Tabulate(#[from] TabulateError),
}
