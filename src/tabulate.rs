//! Tabulator: project every node in a cascade tree into one table row.
//!
//! The header row is the declared templates' named fields followed by the
//! object-type template's own keys. Rows appear in document order: each
//! directory contributes a row for its own data file, then its children,
//! sorted by name. Cells come from the node's file with path-inferred
//! fields overlaid; absent fields render empty.

use crate::document::{self, load_document};
use crate::error::{StructureError, TabulateError};
use crate::root::{self, RootInfo};
use crate::walk;
use comfy_table::presets;
use std::path::Path;
use toml_edit::DocumentMut;
use tracing::{debug, warn};

type Row = Vec<Option<String>>;

/// Render a table of every node under `root` in the given format. Formats
/// are the comfy-table styles `simple`, `plain`, `grid`, `github`, `utf8`,
/// plus `csv`.
pub fn tabulate(root: &Path, format: &str) -> Result<String, TabulateError> {
    let marker = root.join(root::ROOT_MARKER);
    if !marker.is_file() {
        return Err(StructureError::MissingRoot(root.to_path_buf()).into());
    }
    let info = RootInfo::load(&marker)?;
    let (template_path, _) = root::find_template(root)?;
    let template = load_document(&template_path)?;

    let mut headers: Vec<String> = Vec::new();
    for t in info.declared_templates() {
        for field in t.fields() {
            if !headers.contains(field) {
                headers.push(field.clone());
            }
        }
    }
    for (key, _) in template.as_table().iter() {
        if !headers.iter().any(|h| h == key) {
            headers.push(key.to_string());
        }
    }

    let mut rows = Vec::new();
    walk_rows(root, root, &info, &headers, 0, &mut rows)?;
    debug!(rows = rows.len(), columns = headers.len(), "tabulated tree");

    render(&headers, &rows, format)
}

fn walk_rows(
    dir: &Path,
    root: &Path,
    info: &RootInfo,
    headers: &[String],
    depth: usize,
    rows: &mut Vec<Row>,
) -> Result<(), TabulateError> {
    for entry in walk::sorted_dir(dir)? {
        let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if entry.is_dir() {
            rows.push(project_row(
                &entry.join(format!("{}.toml", name)),
                root,
                info,
                headers,
            ));
            walk_rows(&entry, root, info, headers, depth + 1, rows)?;
        } else if depth > 0 {
            // The directory's own data file already produced a row.
            if entry.file_stem() == dir.file_name() {
                continue;
            }
            if !walk::is_data_file(&entry) {
                continue;
            }
            rows.push(project_row(&entry, root, info, headers));
        }
    }
    Ok(())
}

fn project_row(path: &Path, root: &Path, info: &RootInfo, headers: &[String]) -> Row {
    let doc = if path.is_file() {
        match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("{}", e);
                DocumentMut::new()
            }
        }
    } else {
        DocumentMut::new()
    };

    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel_str = rel.to_string_lossy().replace('\\', "/");
    let inferred = info.infer_exact_reversed(&rel_str).unwrap_or_default();

    headers
        .iter()
        .map(|header| {
            inferred
                .iter()
                .find(|(field, _)| field == header)
                .map(|(_, value)| value.clone())
                .or_else(|| doc.get(header).and_then(document::display_value))
        })
        .collect()
}

fn render(headers: &[String], rows: &[Row], format: &str) -> Result<String, TabulateError> {
    if format == "csv" {
        let mut writer = csv::Writer::from_writer(Vec::<u8>::new());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.flush().map_err(TabulateError::Io)?;
        let bytes = writer.into_inner().map_err(|e| {
            TabulateError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    let preset = match format {
        "simple" => presets::ASCII_HORIZONTAL_ONLY,
        "plain" => presets::NOTHING,
        "grid" => presets::ASCII_FULL,
        "github" | "markdown" => presets::ASCII_MARKDOWN,
        "utf8" | "fancy" => presets::UTF8_FULL,
        other => return Err(TabulateError::UnknownFormat(other.to_string())),
    };

    let mut table = comfy_table::Table::new();
    table.load_preset(preset);
    table.set_header(headers.to_vec());
    for row in rows {
        table.add_row(
            row.iter()
                .map(|cell| cell.as_deref().unwrap_or("").to_string()),
        );
    }
    Ok(table.to_string())
}
