//! Filter engine: cascade every leaf under a root and keep the entries
//! whose fields match caller-supplied acceptable values.
//!
//! Predicates arrive as ad-hoc TOML fragments ("color = \"red\""); each
//! fragment's top-level keys contribute one acceptable value per key, and
//! repeated fragments union per key. An entry survives only when it carries
//! every predicate key with one of that key's acceptable values.

use crate::cascade::{cascade_grouped, Grouping};
use crate::document;
use crate::error::{FilterError, StructureError};
use crate::root::{self, RootCache};
use crate::walk;
use std::collections::BTreeMap;
use std::path::Path;
use toml_edit::{DocumentMut, Item, Table};
use tracing::debug;

type PredicateSet = BTreeMap<String, Vec<Item>>;

/// Cascade all leaves under `root` (which must itself hold the root marker)
/// and drop entries that fail the predicates.
pub fn filter(
    root: &Path,
    fragments: &[String],
    cache: &mut RootCache,
) -> Result<DocumentMut, FilterError> {
    let marker = root.join(root::ROOT_MARKER);
    if !marker.is_file() {
        return Err(StructureError::MissingRoot(root.to_path_buf()).into());
    }
    let (_, object_type) = root::find_template(root)?;

    let predicates = build_predicates(fragments)?;
    let leaves = walk::toml_files(root, 2)?;
    debug!(
        leaves = leaves.len(),
        predicates = predicates.len(),
        "cascading leaves for filter"
    );

    let mut doc = cascade_grouped(&leaves, Grouping::ByObjectType, cache)?;

    if let Some(item) = doc.get_mut(&object_type) {
        if let Some(entries) = item.as_array_of_tables_mut() {
            // Reverse iteration keeps indices valid while removing.
            for i in (0..entries.len()).rev() {
                let keep = entries
                    .get(i)
                    .is_some_and(|entry| entry_matches(entry, &predicates));
                if !keep {
                    entries.remove(i);
                }
            }
        }
    }
    Ok(doc)
}

fn build_predicates(fragments: &[String]) -> Result<PredicateSet, FilterError> {
    let mut acceptable: PredicateSet = BTreeMap::new();
    for fragment in fragments {
        let parsed = fragment
            .parse::<DocumentMut>()
            .map_err(|e| FilterError::Predicate {
                fragment: fragment.clone(),
                source: e,
            })?;
        for (key, item) in parsed.as_table().iter() {
            acceptable
                .entry(key.to_string())
                .or_default()
                .push(item.clone());
        }
    }
    Ok(acceptable)
}

fn entry_matches(entry: &Table, predicates: &PredicateSet) -> bool {
    predicates.iter().all(|(key, accepted)| {
        entry
            .get(key)
            .is_some_and(|value| accepted.iter().any(|a| document::items_equal(value, a)))
    })
}
