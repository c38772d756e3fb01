//! Document model contract over `toml_edit`.
//!
//! The cascade system needs an ordered, comment-preserving, round-trip
//! document representation. `toml_edit` provides that; this module wraps the
//! operations the rest of the crate relies on: load/save, the value-kind
//! classification used by the checker, and the deep value equality used by
//! the filter and coalesce engines.

use crate::error::DocumentError;
use std::fs;
use std::path::Path;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Parse a document from disk.
pub fn load_document(path: &Path) -> Result<DocumentMut, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&text, path)
}

/// Parse a document from text, attributing errors to `origin`.
pub fn parse_document(text: &str, origin: &Path) -> Result<DocumentMut, DocumentError> {
    text.parse::<DocumentMut>().map_err(|e| DocumentError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })
}

/// Serialize a document back to disk.
pub fn save_document(path: &Path, doc: &DocumentMut) -> Result<(), DocumentError> {
    fs::write(path, doc.to_string()).map_err(|e| DocumentError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Concrete value kinds used for template conformance checks. There are no
/// schema annotations; the kind of the literal value in the template is
/// authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    Array,
    Table,
}

/// Classify an item by its concrete value representation.
pub fn value_kind(item: &Item) -> Option<ValueKind> {
    match item {
        Item::Value(v) => Some(match v {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Datetime(_) => ValueKind::Datetime,
            Value::Array(_) => ValueKind::Array,
            Value::InlineTable(_) => ValueKind::Table,
        }),
        Item::Table(_) => Some(ValueKind::Table),
        Item::ArrayOfTables(_) => Some(ValueKind::Array),
        Item::None => None,
    }
}

/// Deep structural equality on items, ignoring formatting and comments.
pub fn items_equal(a: &Item, b: &Item) -> bool {
    match (a, b) {
        (Item::Value(x), Item::Value(y)) => values_equal(x, y),
        (Item::Table(x), Item::Table(y)) => tables_equal(x, y),
        (Item::ArrayOfTables(x), Item::ArrayOfTables(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(s, t)| tables_equal(s, t))
        }
        (Item::Value(Value::InlineTable(x)), Item::Table(y))
        | (Item::Table(y), Item::Value(Value::InlineTable(x))) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| {
                    y.get(k)
                        .is_some_and(|other| items_equal(&Item::Value(v.clone()), other))
                })
        }
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.value() == y.value(),
        (Value::Integer(x), Value::Integer(y)) => x.value() == y.value(),
        (Value::Float(x), Value::Float(y)) => x.value() == y.value(),
        (Value::Boolean(x), Value::Boolean(y)) => x.value() == y.value(),
        (Value::Datetime(x), Value::Datetime(y)) => x.value() == y.value(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(s, t)| values_equal(s, t))
        }
        (Value::InlineTable(x), Value::InlineTable(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| {
                    y.get(k).is_some_and(|other| values_equal(v, other))
                })
        }
        _ => false,
    }
}

fn tables_equal(a: &Table, b: &Table) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(k, v)| b.get(k).is_some_and(|other| items_equal(v, other)))
}

/// Render an item for human-readable cell output: strings unquoted, other
/// values in their TOML notation.
pub fn display_value(item: &Item) -> Option<String> {
    match item {
        Item::Value(Value::String(s)) => Some(s.value().clone()),
        Item::Value(v) => Some(v.to_string().trim().to_string()),
        Item::Table(t) => Some(t.to_string().trim().to_string()),
        Item::ArrayOfTables(_) => Some(item.to_string().trim().to_string()),
        Item::None => None,
    }
}
