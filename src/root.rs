//! Root resolution and path-template import expansion.
//!
//! A cascade tree is identified by a `.cascade.toml` marker at its topmost
//! directory. The marker declares the tree's path templates; loading it also
//! synthesizes the implied templates for every ancestor segment of each
//! declared template (a directory's own data file is named after the
//! directory). The extended list, in order, is what all matching uses.

use crate::document::load_document;
use crate::error::{RootError, StructureError};
use crate::pattern::PathTemplate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use toml_edit::Item;
use tracing::debug;

/// Sentinel file marking the top of a cascade tree.
pub const ROOT_MARKER: &str = ".cascade.toml";

/// Suffix identifying the per-root object-type template.
pub const TEMPLATE_SUFFIX: &str = ".template.toml";

/// A loaded root marker: its directory plus the declared and implied path
/// templates, compiled, in matching order. Immutable once loaded.
#[derive(Debug)]
pub struct RootInfo {
    dir: PathBuf,
    templates: Vec<PathTemplate>,
    declared: usize,
}

impl RootInfo {
    /// Parse a root marker and expand its template list.
    pub fn load(marker: &Path) -> Result<Self, RootError> {
        let doc = load_document(marker)?;
        let paths = doc
            .get("paths")
            .and_then(Item::as_array)
            .ok_or_else(|| RootError::InvalidMarker {
                path: marker.to_path_buf(),
                reason: "missing 'paths' array".to_string(),
            })?;

        let mut declared: Vec<String> = Vec::new();
        for value in paths.iter() {
            let Some(s) = value.as_str() else {
                return Err(RootError::InvalidMarker {
                    path: marker.to_path_buf(),
                    reason: "non-string entry in 'paths'".to_string(),
                });
            };
            declared.push(s.to_string());
        }

        let mut all = declared.clone();
        all.extend(implied_templates(&declared));
        let templates = all
            .iter()
            .map(|t| PathTemplate::compile(t))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            marker = %marker.display(),
            declared = declared.len(),
            total = templates.len(),
            "loaded cascade root"
        );

        Ok(Self {
            dir: marker.parent().unwrap_or(Path::new("")).to_path_buf(),
            templates,
            declared: declared.len(),
        })
    }

    /// The directory holding the root marker.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Declared plus implied templates, in matching order.
    pub fn templates(&self) -> &[PathTemplate] {
        &self.templates
    }

    /// Declared templates only.
    pub fn declared_templates(&self) -> &[PathTemplate] {
        &self.templates[..self.declared]
    }

    /// First template matching `rel` anywhere, in list order.
    pub fn infer(&self, rel: &str) -> Option<(&PathTemplate, Vec<(String, String)>)> {
        self.templates
            .iter()
            .find_map(|t| t.search(rel).map(|fields| (t, fields)))
    }

    /// First whole-path match trying the list in reverse, so the most
    /// specific implied templates are consulted before the declared ones.
    /// Used by the tabulator.
    pub fn infer_exact_reversed(&self, rel: &str) -> Option<Vec<(String, String)>> {
        self.templates.iter().rev().find_map(|t| t.matches(rel))
    }
}

/// For every ancestor segment of each declared template (deepest first,
/// skipping the unnamed root segment), the segment's own self-named data
/// file becomes an implied template. No deduplication: matching stops at
/// the first hit, so repeats are harmless.
fn implied_templates(declared: &[String]) -> Vec<String> {
    let mut implied = Vec::new();
    for template in declared {
        for ancestor in Path::new(template).ancestors().skip(1) {
            let Some(name) = ancestor.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            implied.push(format!("{}/{}.toml", ancestor.display(), name));
        }
    }
    implied
}

/// Walk ancestor directories of `target`, nearest first, until one holds
/// the root marker. Returns the marker's path.
pub fn resolve_root(target: &Path) -> Option<PathBuf> {
    for dir in target.ancestors().skip(1) {
        let candidate = dir.join(ROOT_MARKER);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Locate the exactly-one object-type template in `dir`. Returns its path
/// and the object-type name (the file name minus the template suffix).
pub fn find_template(dir: &Path) -> Result<(PathBuf, String), StructureError> {
    let entries = std::fs::read_dir(dir).map_err(|e| StructureError::Scan {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates: Vec<(PathBuf, String)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StructureError::Scan {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(object_type) = name.strip_suffix(TEMPLATE_SUFFIX) {
            if !object_type.is_empty() && entry.path().is_file() {
                candidates.push((entry.path(), object_type.to_string()));
            }
        }
    }

    candidates.sort();
    match candidates.len() {
        0 => Err(StructureError::MissingTemplate(dir.to_path_buf())),
        1 => Ok(candidates.remove(0)),
        n => Err(StructureError::AmbiguousTemplate(dir.to_path_buf(), n)),
    }
}

/// Per-invocation cache of loaded roots, keyed by marker path. Write-once
/// per root and read-only thereafter within a run; passed explicitly
/// through the call graph rather than held as process state.
#[derive(Debug, Default)]
pub struct RootCache {
    loaded: HashMap<PathBuf, RootInfo>,
}

impl RootCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a loaded root, parsing and expanding the marker on first use.
    pub fn get_or_load(&mut self, marker: &Path) -> Result<&RootInfo, RootError> {
        if !self.loaded.contains_key(marker) {
            let info = RootInfo::load(marker)?;
            self.loaded.insert(marker.to_path_buf(), info);
        }
        Ok(&self.loaded[marker])
    }
}
