//! Schema refactor: rename a key in the object-type template and in every
//! data file under the root.
//!
//! The template is authoritative: a key that is not declared there cannot
//! be renamed, and that check happens before any file is touched. The
//! renamed key keeps its value and moves to the end of each document, as an
//! append does.

use crate::document::{load_document, save_document};
use crate::error::RefactorError;
use crate::root::{self};
use crate::walk;
use std::path::Path;
use tracing::debug;

/// Rename `old_name` to `new_name` in the template and all data files
/// under `root`. Returns how many data files were rewritten.
pub fn rename(old_name: &str, new_name: &str, root: &Path) -> Result<usize, RefactorError> {
    let (template_path, _) = root::find_template(root)?;
    let mut template = load_document(&template_path)?;

    let Some(value) = template.as_table_mut().remove(old_name) else {
        return Err(RefactorError::KeyNotInTemplate {
            key: old_name.to_string(),
            template: template_path,
        });
    };
    template.as_table_mut().insert(new_name, value);
    save_document(&template_path, &template)?;
    debug!(
        template = %template_path.display(),
        old = old_name,
        new = new_name,
        "renamed key in template"
    );

    let mut changed = 0;
    for file in walk::toml_files(root, 1)? {
        if file.file_name().and_then(|n| n.to_str()) == Some(root::ROOT_MARKER) {
            continue;
        }
        if file == template_path {
            continue;
        }
        let mut doc = load_document(&file)?;
        let Some(value) = doc.as_table_mut().remove(old_name) else {
            continue;
        };
        doc.as_table_mut().insert(new_name, value);
        save_document(&file, &doc)?;
        changed += 1;
    }
    debug!(changed, "renamed key in data files");
    Ok(changed)
}
