//! End-to-end cascade behavior over real trees.

use super::test_utils::{seed_parts_tree, write_file};
use anyhow::Result;
use cascade::cascade::cascade;
use cascade::document::parse_document;
use cascade::root::RootCache;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_overlay_precedence_along_chain() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write_file(root, ".cascade.toml", "paths = []\n");
    write_file(root, "things.template.toml", "k = 0\n");
    write_file(root, "a/a.toml", "k = 1\n");
    write_file(root, "a/b/b.toml", "k = 2\n");
    let unset_leaf = write_file(root, "a/b/leaf.toml", "");
    let set_leaf = write_file(root, "a/b/other.toml", "k = 3\n");

    let mut cache = RootCache::new();
    let doc = cascade(&[unset_leaf], &mut cache)?;
    assert_eq!(doc["k"].as_integer(), Some(2), "deepest ancestor wins");

    let doc = cascade(&[set_leaf], &mut cache)?;
    assert_eq!(doc["k"].as_integer(), Some(3), "leaf value wins over all");
    Ok(())
}

#[test]
fn test_path_inferred_fields_yield_to_explicit_data() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write_file(root, ".cascade.toml", "paths = [\"{vendor}/{part}.toml\"]\n");
    write_file(root, "parts.template.toml", "vendor = \"\"\n");
    write_file(root, "acme/acme.toml", "");
    let leaf = write_file(root, "acme/widget.toml", "vendor = \"Acme Corp\"\n");

    let mut cache = RootCache::new();
    let doc = cascade(&[leaf], &mut cache)?;
    assert_eq!(doc["vendor"].as_str(), Some("Acme Corp"));
    assert_eq!(doc["part"].as_str(), Some("widget"));
    Ok(())
}

#[test]
fn test_multi_target_groups_by_object_type() -> Result<()> {
    let temp = TempDir::new()?;
    let foo_root = temp.path().join("foo_tree");
    let bar_root = temp.path().join("bar_tree");
    write_file(&foo_root, ".cascade.toml", "paths = []\n");
    write_file(&foo_root, "foo.template.toml", "n = 0\n");
    let foo_leaf = write_file(&foo_root, "sub/one.toml", "n = 1\n");
    write_file(&bar_root, ".cascade.toml", "paths = []\n");
    write_file(&bar_root, "bar.template.toml", "n = 0\n");
    let bar_leaf = write_file(&bar_root, "sub/two.toml", "n = 2\n");

    let mut cache = RootCache::new();
    let doc = cascade(&[foo_leaf, bar_leaf], &mut cache)?;

    let foo = doc["foo"].as_array_of_tables().unwrap();
    let bar = doc["bar"].as_array_of_tables().unwrap();
    assert_eq!(foo.len(), 1);
    assert_eq!(bar.len(), 1);
    assert_eq!(foo.get(0).unwrap()["n"].as_integer(), Some(1));
    assert_eq!(bar.get(0).unwrap()["n"].as_integer(), Some(2));
    Ok(())
}

#[test]
fn test_same_root_targets_share_one_marker_parse() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    seed_parts_tree(root);
    write_file(root, "acme/gadget.toml", "mass = 30\n");

    let mut cache = RootCache::new();
    let doc = cascade(
        &[root.join("acme/widget.toml"), root.join("acme/gadget.toml")],
        &mut cache,
    )?;
    let parts = doc["parts"].as_array_of_tables().unwrap();
    assert_eq!(parts.len(), 2);
    // Input order is preserved.
    assert_eq!(parts.get(0).unwrap()["mass"].as_integer(), Some(20));
    assert_eq!(parts.get(1).unwrap()["mass"].as_integer(), Some(30));
    Ok(())
}

#[test]
fn test_output_document_structure_and_comments() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    seed_parts_tree(root);

    let mut cache = RootCache::new();
    let text = cascade(&[root.join("acme/widget.toml")], &mut cache)?.to_string();

    let pos = |needle: &str| text.find(needle).unwrap_or_else(|| panic!("missing {needle:?}"));
    let path_comment = pos("# Data for path: acme/widget.toml");
    let inferred = pos("# Data inferred from the path: {vendor}/{part}.toml");
    let ancestor = pos("# Data from acme/acme.toml");
    let leaf = pos("# Data from acme/widget.toml");
    assert!(path_comment < inferred && inferred < ancestor && ancestor < leaf);

    // The merged document is itself valid TOML.
    let reparsed = parse_document(&text, Path::new("output"))?;
    assert_eq!(reparsed["vendor"].as_str(), Some("acme"));
    assert_eq!(reparsed["mass"].as_integer(), Some(20));
    Ok(())
}

#[test]
fn test_leaf_comments_survive_the_merge() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write_file(root, ".cascade.toml", "paths = []\n");
    write_file(root, "parts.template.toml", "mass = 0\n");
    write_file(root, "acme/acme.toml", "");
    let leaf = write_file(
        root,
        "acme/widget.toml",
        "# grams, not kilograms\nmass = 20\n",
    );

    let mut cache = RootCache::new();
    let text = cascade(&[leaf], &mut cache)?.to_string();
    assert!(text.contains("# grams, not kilograms"));
    Ok(())
}

#[test]
fn test_multi_target_output_is_idempotent() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    seed_parts_tree(root);
    write_file(root, "acme/gadget.toml", "mass = 30\n");
    let targets = [root.join("acme/widget.toml"), root.join("acme/gadget.toml")];

    let first = cascade(&targets, &mut RootCache::new())?.to_string();
    let second = cascade(&targets, &mut RootCache::new())?.to_string();
    assert_eq!(first, second);
    Ok(())
}
