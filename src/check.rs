//! Checker: validate every data file's keys and value kinds against the
//! object-type template.
//!
//! The template's literal values are the schema: a key present in a data
//! file must exist in the template and hold a value of the same concrete
//! kind. Findings accumulate per file; nothing here is fatal mid-scan.

use crate::document::{self, load_document};
use crate::error::{CheckError, DocumentError};
use crate::root;
use crate::walk;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;
use tracing::debug;

/// Per-file validation findings, keyed by root-relative path. Only files
/// with at least one finding appear.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub errors: BTreeMap<PathBuf, Vec<String>>,
}

impl CheckReport {
    /// Total findings across all files.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every data file under `root` against the root's template.
pub fn check(root: &Path) -> Result<CheckReport, CheckError> {
    let (template_path, _) = root::find_template(root)?;
    let template = load_document(&template_path)?;

    let mut report = CheckReport::default();
    for file in walk::toml_files(root, 2)? {
        let rel = file.strip_prefix(root).unwrap_or(&file).to_path_buf();
        let mut errors = Vec::new();

        let parsed = match load_document(&file) {
            Ok(doc) => doc,
            Err(DocumentError::Parse { source, .. }) => {
                errors.push(format!("Parse error: {}", source));
                DocumentMut::new()
            }
            Err(e) => return Err(e.into()),
        };

        for (key, item) in parsed.as_table().iter() {
            match template.get(key) {
                None => errors.push(format!("Unknown key {}", key)),
                Some(expected) => {
                    if document::value_kind(expected) != document::value_kind(item) {
                        errors.push(format!("Type mismatch for key {}", key));
                    }
                }
            }
        }

        if !errors.is_empty() {
            report.errors.insert(rel, errors);
        }
    }

    debug!(
        files_with_errors = report.errors.len(),
        total = report.error_count(),
        "check finished"
    );
    Ok(report)
}
