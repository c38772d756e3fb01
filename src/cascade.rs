//! Cascade engine: root-to-leaf overlay merge of TOML data files.
//!
//! Each target resolves to a cascade root, gains fields inferred from its
//! root-relative path, and is overlaid with every ancestor directory's data
//! file from the root's directory down, its own values last. Later blocks
//! overwrite earlier same-key entries while the key keeps its
//! first-declared position. Output is one merged document for a single
//! target, or one array-of-tables per object type for several.

use crate::document::load_document;
use crate::error::{CascadeError, DocumentError};
use crate::root::{self, RootCache};
use std::path::{Path, PathBuf};
use toml_edit::{ArrayOfTables, DocumentMut, Item, Table};
use tracing::{debug, warn};

/// Output grouping for a cascade run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Merge into the top-level document. Intended for a single target.
    Single,
    /// One `[[<object type>]]` entry per target, in input order.
    ByObjectType,
}

/// Cascade `targets` into one document. A lone target merges into the
/// top-level document; several targets group per object type.
pub fn cascade(targets: &[PathBuf], cache: &mut RootCache) -> Result<DocumentMut, CascadeError> {
    let grouping = if targets.len() > 1 {
        Grouping::ByObjectType
    } else {
        Grouping::Single
    };
    cascade_grouped(targets, grouping, cache)
}

/// Cascade with an explicit grouping; the filter engine always groups even
/// when only one leaf exists under its root.
pub fn cascade_grouped(
    targets: &[PathBuf],
    grouping: Grouping,
    cache: &mut RootCache,
) -> Result<DocumentMut, CascadeError> {
    let mut output = DocumentMut::new();
    let mut trailing = String::new();

    for target in targets {
        let Some(resolved) = cascade_one(target, grouping, cache)? else {
            continue;
        };
        trailing.push_str(&resolved.leftover);
        match grouping {
            Grouping::Single => {
                *output.as_table_mut() = resolved.table;
            }
            Grouping::ByObjectType => {
                let entry = output
                    .entry(&resolved.object_type)
                    .or_insert(Item::ArrayOfTables(ArrayOfTables::new()));
                if let Item::ArrayOfTables(aot) = entry {
                    aot.push(resolved.table);
                }
            }
        }
    }

    if !trailing.is_empty() {
        output.set_trailing(trailing);
    }
    Ok(output)
}

/// One target's merged table plus any comment text that found no key to
/// attach to (an all-overwrites or empty block at the end of the merge).
struct ResolvedTarget {
    object_type: String,
    table: Table,
    leftover: String,
}

fn cascade_one(
    target: &Path,
    grouping: Grouping,
    cache: &mut RootCache,
) -> Result<Option<ResolvedTarget>, CascadeError> {
    let full_path = match dunce::canonicalize(target) {
        Ok(p) => p,
        Err(e) => {
            warn!("Cannot resolve target {}: {}", target.display(), e);
            return Ok(None);
        }
    };

    let Some(marker) = root::resolve_root(&full_path) else {
        warn!("No root found for {}", target.display());
        return Ok(None);
    };
    let info = cache.get_or_load(&marker)?;

    let object_type = match root::find_template(info.dir()) {
        Ok((_, object_type)) => object_type,
        Err(e) => {
            warn!("No template found for {}: {}", target.display(), e);
            return Ok(None);
        }
    };

    let leaf = match load_document(&full_path) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Error parsing {}: {}", target.display(), e);
            return Ok(None);
        }
    };

    let rel = match full_path.strip_prefix(info.dir()) {
        Ok(rel) => rel,
        Err(_) => {
            warn!("Target {} is outside its root", target.display());
            return Ok(None);
        }
    };
    let rel_str = rel.to_string_lossy().replace('\\', "/");
    debug!(target = %rel_str, object_type = %object_type, "cascading");

    let mut table = Table::new();
    let mut writer = BlockWriter::new();

    writer.comment(&format!("Data for path: {}", rel_str));
    if grouping == Grouping::ByObjectType {
        writer.blank_line();
    }

    // Path inference: first match over declared ++ implied templates. The
    // fields land before any overlay so explicit data can override them.
    if let Some((template, fields)) = info.infer(&rel_str) {
        writer.comment(&format!("Data inferred from the path: {}", template.source()));
        for (key, value) in fields {
            writer.set(&mut table, &key, toml_edit::value(value));
        }
    }

    // Ancestor overlay, root's own directory down to the target's parent.
    let mut ancestors: Vec<&Path> = full_path.ancestors().skip(1).collect();
    ancestors.reverse();
    for dir in ancestors {
        if !dir.starts_with(info.dir()) {
            continue;
        }
        let Some(stem) = dir.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        // A directory named like the target is the target's own level,
        // already represented by the leaf itself.
        if Some(stem) == full_path.file_stem().and_then(|s| s.to_str()) {
            continue;
        }
        let dir_toml = dir.join(format!("{}.toml", stem));
        if !dir_toml.is_file() {
            continue;
        }
        let parsed = load_document(&dir_toml).map_err(|e| match e {
            DocumentError::Parse { path, source } => CascadeError::AncestorParse { path, source },
            DocumentError::Io { path, source } | DocumentError::Write { path, source } => {
                CascadeError::AncestorIo { path, source }
            }
        })?;

        let anc_rel = dir_toml.strip_prefix(info.dir()).unwrap_or(&dir_toml);
        writer.blank_line();
        writer.comment(&format!("Data from {}", anc_rel.display()));
        writer.copy_items(&mut table, parsed.as_table());
    }

    // Leaf overlay last: the target's own values win.
    writer.blank_line();
    writer.comment(&format!("Data from {}", rel_str));
    writer.copy_items(&mut table, leaf.as_table());

    Ok(Some(ResolvedTarget {
        object_type,
        table,
        leftover: writer.into_pending(),
    }))
}

/// Accumulates comment/blank-line text and attaches it to the next key a
/// block newly inserts. Overwrites keep the key's original position and
/// decoration, so their block's commentary carries forward instead.
struct BlockWriter {
    pending: String,
}

impl BlockWriter {
    fn new() -> Self {
        Self {
            pending: String::new(),
        }
    }

    fn comment(&mut self, text: &str) {
        self.pending.push_str("# ");
        self.pending.push_str(text);
        self.pending.push('\n');
    }

    fn blank_line(&mut self) {
        self.pending.push('\n');
    }

    /// Add or overwrite `key`. New keys append and absorb pending
    /// decoration; existing keys only swap their value.
    fn set(&mut self, table: &mut Table, key: &str, item: Item) {
        if table.contains_key(key) {
            table[key] = item;
            return;
        }
        table.insert(key, item);
        if !self.pending.is_empty() {
            if let Some(mut k) = table.key_mut(key) {
                k.leaf_decor_mut()
                    .set_prefix(std::mem::take(&mut self.pending));
            }
        }
    }

    /// Append every key/value of `src` in its own declared order, carrying
    /// along any comment lines attached to the source keys.
    fn copy_items(&mut self, table: &mut Table, src: &Table) {
        for (key, item) in src.iter() {
            if let Some((src_key, _)) = src.get_key_value(key) {
                if let Some(prefix) = src_key.leaf_decor().prefix().and_then(|r| r.as_str()) {
                    for line in prefix.lines() {
                        let line = line.trim_start();
                        if line.starts_with('#') {
                            self.pending.push_str(line);
                            self.pending.push('\n');
                        }
                    }
                }
            }
            self.set(table, key, item.clone());
        }
    }

    fn into_pending(self) -> String {
        self.pending
    }
}
