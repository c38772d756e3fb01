//! Filesystem enumeration for cascade trees.
//!
//! All traversal is sorted by path so that every run over the same tree
//! visits nodes in the same order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The single recognized data-file extension.
pub const DATA_EXTENSION: &str = "toml";

/// True when `path` names a node data file: after ignoring leading dots,
/// the file name carries exactly one `.`-separated suffix and it is the
/// data extension. `foo.toml` qualifies; `foo.template.toml` does not.
pub fn is_data_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let mut parts = name.trim_start_matches('.').split('.');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(stem), Some(ext), None) if !stem.is_empty() && ext == DATA_EXTENSION
    )
}

/// Collect every file with the data extension at `min_depth` or deeper
/// under `root`, sorted by path. `min_depth` of 2 matches the scan set used
/// by the filter and checker (anything at least one directory below the
/// root, which leaves the root-level marker and template out); 1 covers the
/// whole tree.
pub fn toml_files(root: &Path, min_depth: usize) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(min_depth).follow_links(false) {
        let entry = entry.map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to walk {}: {}", root.display(), e),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(DATA_EXTENSION) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// The immediate entries of a directory, sorted by path.
pub fn sorted_dir(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(path)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    entries.sort();
    Ok(entries)
}
