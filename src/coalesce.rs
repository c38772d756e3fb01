//! Coalescer: hoist key/value pairs common to every child of a directory
//! into that directory's own data file.
//!
//! The traversal is depth-first, post-order. Every node yields one of three
//! outcomes: `Shared` carries key/value pairs (a file's whole body, or
//! whatever a directory hoisted), `Empty` marks a node that participates
//! but contributes nothing shareable (an unparseable or empty file), and
//! `NotApplicable` marks entries that do not take part at all. An `Empty`
//! child poisons its parent: nothing is hoisted there, no file is touched
//! at that level, and the poison propagates upward.

use crate::document::{self, load_document, save_document};
use crate::error::{CoalesceError, DocumentError};
use crate::walk;
use std::path::Path;
use toml_edit::{DocumentMut, Item};
use tracing::{debug, trace};

/// Result of coalescing one node.
#[derive(Debug)]
pub enum CoalesceOutcome {
    /// The node's shareable key/value pairs, in declared order.
    Shared(Vec<(String, Item)>),
    /// Participates but contributes nothing; poisons the parent level.
    Empty,
    /// Not a data file or directory; skipped entirely.
    NotApplicable,
}

/// Recursively coalesce the subtree at `path`. Directory levels whose
/// children all agree on some key/value pairs get those pairs appended to
/// their own data file and stripped from every child.
///
/// `path` should be canonical; child paths are derived from directory
/// listings and inherit its form.
pub fn coalesce(path: &Path) -> Result<CoalesceOutcome, CoalesceError> {
    if path.is_dir() {
        coalesce_dir(path)
    } else {
        coalesce_file(path)
    }
}

fn coalesce_file(path: &Path) -> Result<CoalesceOutcome, CoalesceError> {
    if !path.is_file() || !walk::is_data_file(path) {
        return Ok(CoalesceOutcome::NotApplicable);
    }
    match load_document(path) {
        Ok(doc) => {
            let pairs: Vec<(String, Item)> = doc
                .as_table()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            if pairs.is_empty() {
                Ok(CoalesceOutcome::Empty)
            } else {
                Ok(CoalesceOutcome::Shared(pairs))
            }
        }
        Err(DocumentError::Parse { path, .. }) => {
            trace!("unparseable data file {} contributes nothing", path.display());
            Ok(CoalesceOutcome::Empty)
        }
        Err(e) => Err(e.into()),
    }
}

fn coalesce_dir(dir: &Path) -> Result<CoalesceOutcome, CoalesceError> {
    let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()).map(String::from) else {
        return Ok(CoalesceOutcome::NotApplicable);
    };

    let mut shared: Option<Vec<(String, Item)>> = None;
    let mut poisoned = false;

    for entry in walk::sorted_dir(dir)? {
        if is_hidden(&entry) || is_own_data_file(&entry, &dir_name) {
            continue;
        }
        match coalesce(&entry)? {
            CoalesceOutcome::NotApplicable => {}
            CoalesceOutcome::Empty => poisoned = true,
            CoalesceOutcome::Shared(pairs) => match shared.as_mut() {
                None => shared = Some(pairs),
                Some(current) => intersect(current, &pairs),
            },
        }
    }

    if poisoned {
        return Ok(CoalesceOutcome::Empty);
    }
    let Some(shared) = shared else {
        return Ok(CoalesceOutcome::NotApplicable);
    };
    if shared.is_empty() {
        return Ok(CoalesceOutcome::Empty);
    }

    // Hoist: append the shared pairs to this directory's own data file.
    let dir_toml = dir.join(format!("{}.toml", dir_name));
    let mut own = if dir_toml.is_file() {
        match load_document(&dir_toml) {
            Ok(doc) => doc,
            Err(DocumentError::Parse { .. }) => return Ok(CoalesceOutcome::Empty),
            Err(e) => return Err(e.into()),
        }
    } else {
        DocumentMut::new()
    };
    for (key, item) in &shared {
        own.as_table_mut().insert(key, item.clone());
    }
    save_document(&dir_toml, &own)?;
    debug!(
        dir = %dir.display(),
        hoisted = shared.len(),
        "coalesced shared keys"
    );

    // Strip the hoisted keys from every child's own file.
    for entry in walk::sorted_dir(dir)? {
        if is_hidden(&entry) || is_own_data_file(&entry, &dir_name) {
            continue;
        }
        let target = if entry.is_dir() {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            entry.join(format!("{}.toml", name))
        } else {
            entry
        };
        if !target.is_file() || !walk::is_data_file(&target) {
            continue;
        }
        let mut doc = load_document(&target)?;
        for (key, _) in &shared {
            doc.as_table_mut().remove(key);
        }
        save_document(&target, &doc)?;
    }

    Ok(CoalesceOutcome::Shared(shared))
}

fn is_hidden(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.starts_with('.'))
}

fn is_own_data_file(path: &Path, dir_name: &str) -> bool {
    path.file_stem().and_then(|s| s.to_str()) == Some(dir_name)
}

fn intersect(current: &mut Vec<(String, Item)>, other: &[(String, Item)]) {
    current.retain(|(key, value)| {
        other
            .iter()
            .any(|(k, v)| k == key && document::items_equal(value, v))
    });
}
