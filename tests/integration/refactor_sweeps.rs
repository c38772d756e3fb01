//! In-place refactors exercised over real trees: coalesce and rename.

use super::test_utils::{read_file, write_file};
use anyhow::Result;
use cascade::cascade::cascade;
use cascade::coalesce::{coalesce, CoalesceOutcome};
use cascade::rename::rename;
use cascade::root::RootCache;
use tempfile::TempDir;

#[test]
fn test_coalesce_then_cascade_is_equivalent() -> Result<()> {
    // Hoisting shared pairs must not change what any leaf cascades to.
    let temp = TempDir::new()?;
    let root = temp.path().join("boards");
    write_file(&root, ".cascade.toml", "paths = [\"{vendor}/{board}.toml\"]\n");
    write_file(&root, "boards.template.toml", "chip = \"\"\nflash = 0\n");
    write_file(&root, "acme/red.toml", "chip = \"samd51\"\nflash = 4\n");
    write_file(&root, "acme/blue.toml", "chip = \"samd51\"\nflash = 8\n");
    write_file(&root, "zeta/one.toml", "chip = \"rp2040\"\nflash = 2\n");
    write_file(&root, "zeta/two.toml", "chip = \"rp2040\"\nflash = 2\n");

    let mut cache = RootCache::new();
    let before_red = cascade(&[root.join("acme/red.toml")], &mut cache)?;

    // The vendors disagree on chip, so nothing rises above the vendor
    // level and the top-level outcome is empty.
    let outcome = coalesce(&root)?;
    assert!(matches!(outcome, CoalesceOutcome::Empty));
    assert!(read_file(&root.join("acme/acme.toml")).contains("chip = \"samd51\""));
    assert!(!read_file(&root.join("acme/red.toml")).contains("chip"));
    // zeta agreed on everything, so flash hoisted there too.
    let zeta = read_file(&root.join("zeta/zeta.toml"));
    assert!(zeta.contains("chip = \"rp2040\"") && zeta.contains("flash = 2"));

    let after_red = cascade(&[root.join("acme/red.toml")], &mut RootCache::new())?;
    assert_eq!(before_red["chip"].as_str(), after_red["chip"].as_str());
    assert_eq!(before_red["flash"].as_integer(), after_red["flash"].as_integer());
    Ok(())
}

#[test]
fn test_coalesce_poisoned_level_mutates_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("boards");
    write_file(&root, "acme/red.toml", "chip = \"samd51\"\n");
    write_file(&root, "acme/blue.toml", "chip = \"samd51\"\n");
    write_file(&root, "acme/cracked.toml", "chip = [unterminated\n");
    let red_before = read_file(&root.join("acme/red.toml"));

    let outcome = coalesce(&root)?;
    assert!(matches!(outcome, CoalesceOutcome::Empty));
    assert_eq!(read_file(&root.join("acme/red.toml")), red_before);
    assert!(!root.join("acme/acme.toml").exists());
    Ok(())
}

#[test]
fn test_rename_sweeps_whole_tree() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write_file(root, ".cascade.toml", "paths = []\n");
    write_file(root, "boards.template.toml", "chip = \"\"\n");
    write_file(root, "acme/acme.toml", "chip = \"samd51\"\n");
    write_file(root, "acme/deep/deep.toml", "chip = \"rp2040\"\n");
    write_file(root, "acme/plain.toml", "flash = 4\n");

    let changed = rename("chip", "mcu", root)?;
    assert_eq!(changed, 2);
    assert!(read_file(&root.join("boards.template.toml")).contains("mcu"));
    assert!(read_file(&root.join("acme/acme.toml")).contains("mcu = \"samd51\""));
    assert!(read_file(&root.join("acme/deep/deep.toml")).contains("mcu = \"rp2040\""));
    assert_eq!(read_file(&root.join("acme/plain.toml")), "flash = 4\n");
    Ok(())
}

#[test]
fn test_rename_then_cascade_uses_new_key() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    write_file(root, ".cascade.toml", "paths = []\n");
    write_file(root, "boards.template.toml", "chip = \"\"\n");
    write_file(root, "acme/acme.toml", "chip = \"samd51\"\n");
    let leaf = write_file(root, "acme/red.toml", "");

    rename("chip", "mcu", root)?;
    let doc = cascade(&[leaf], &mut RootCache::new())?;
    assert_eq!(doc["mcu"].as_str(), Some("samd51"));
    assert!(doc.get("chip").is_none());
    Ok(())
}
