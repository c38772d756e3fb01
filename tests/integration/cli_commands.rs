//! CLI dispatch: commands wired through the route table, exit codes checked
//! against the documented surface.

use super::test_utils::{read_file, seed_parts_tree, write_file};
use cascade::cli::{exit_code, CascadeCommands, Commands, RefactorCommands, RunContext};
use tempfile::TempDir;

#[test]
fn test_cascade_files_prints_merged_document() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Cascade {
            command: CascadeCommands::Files {
                paths: vec![temp.path().join("acme/widget.toml")],
            },
        })
        .unwrap();
    assert_eq!(output.code, 0);
    assert!(output.text.contains("mass = 20"));
    assert!(output.text.contains("# Data for path: acme/widget.toml"));
}

#[test]
fn test_cascade_filter_prints_grouped_entries() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());
    write_file(temp.path(), "acme/gadget.toml", "mass = 30\n");

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Cascade {
            command: CascadeCommands::Filter {
                root: temp.path().to_path_buf(),
                filters: vec!["mass = 30".to_string()],
            },
        })
        .unwrap();
    assert!(output.text.contains("[[parts]]"));
    assert!(output.text.contains("mass = 30"));
    assert!(!output.text.contains("mass = 20"));
}

#[test]
fn test_check_exit_code_is_negative_error_count() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "parts.template.toml", "a = 1\n");
    write_file(temp.path(), "sub/leaf.toml", "a = \"x\"\nb = 2\n");

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Check {
            root: temp.path().to_path_buf(),
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(output.code, -2);
    assert!(output.text.contains("Error(s) in"));
    assert!(output.text.contains("Type mismatch for key a"));
    assert!(output.text.contains("Unknown key b"));
}

#[test]
fn test_check_clean_tree_exits_zero_with_no_output() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "parts.template.toml", "a = 1\n");
    write_file(temp.path(), "sub/leaf.toml", "a = 2\n");

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Check {
            root: temp.path().to_path_buf(),
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(output.code, 0);
    assert!(output.text.is_empty());
}

#[test]
fn test_check_json_format() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "parts.template.toml", "a = 1\n");
    write_file(temp.path(), "sub/leaf.toml", "b = 2\n");

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Check {
            root: temp.path().to_path_buf(),
            format: "json".to_string(),
        })
        .unwrap();
    assert_eq!(output.code, -1);
    assert!(output.text.contains("\"error_count\": 1"));
}

#[test]
fn test_missing_template_maps_to_exit_code_two() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), ".cascade.toml", "paths = []\n");

    let mut context = RunContext::new();
    let err = context
        .execute(&Commands::Cascade {
            command: CascadeCommands::Filter {
                root: temp.path().to_path_buf(),
                filters: vec![],
            },
        })
        .unwrap_err();
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_missing_root_marker_maps_to_exit_code_one() {
    let temp = TempDir::new().unwrap();
    let mut context = RunContext::new();
    let err = context
        .execute(&Commands::Cascade {
            command: CascadeCommands::Filter {
                root: temp.path().to_path_buf(),
                filters: vec![],
            },
        })
        .unwrap_err();
    assert_eq!(exit_code(&err), 1);
}

#[test]
fn test_ancestor_parse_failure_maps_to_exit_code_three() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());
    write_file(temp.path(), "acme/acme.toml", "mass = ");

    let mut context = RunContext::new();
    let err = context
        .execute(&Commands::Cascade {
            command: CascadeCommands::Files {
                paths: vec![temp.path().join("acme/widget.toml")],
            },
        })
        .unwrap_err();
    assert_eq!(exit_code(&err), 3);
}

#[test]
fn test_refactor_rename_via_cli() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Refactor {
            command: RefactorCommands::Rename {
                old_name: "mass".to_string(),
                new_name: "weight".to_string(),
                root: temp.path().to_path_buf(),
            },
        })
        .unwrap();
    assert!(output.text.is_empty());
    assert!(read_file(&temp.path().join("acme/widget.toml")).contains("weight = 20"));
}

#[test]
fn test_refactor_rename_unknown_key_exits_one() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());

    let mut context = RunContext::new();
    let err = context
        .execute(&Commands::Refactor {
            command: RefactorCommands::Rename {
                old_name: "volume".to_string(),
                new_name: "size".to_string(),
                root: temp.path().to_path_buf(),
            },
        })
        .unwrap_err();
    assert_eq!(exit_code(&err), 1);
}

#[test]
fn test_refactor_coalesce_via_cli() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("fleet");
    write_file(&root, "one.toml", "shared = true\nunique = 1\n");
    write_file(&root, "two.toml", "shared = true\nunique = 2\n");

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Refactor {
            command: RefactorCommands::Coalesce {
                root: root.clone(),
            },
        })
        .unwrap();
    assert!(output.text.is_empty());
    assert!(read_file(&root.join("fleet.toml")).contains("shared = true"));
}

#[test]
fn test_tabulate_csv_via_cli() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());

    let mut context = RunContext::new();
    let output = context
        .execute(&Commands::Tabulate {
            root: temp.path().to_path_buf(),
            format: "csv".to_string(),
        })
        .unwrap();
    assert!(output.text.starts_with("vendor,part,mass"));
    assert!(output.text.contains("acme,widget,20"));
}

#[test]
fn test_tabulate_unknown_format_exits_one() {
    let temp = TempDir::new().unwrap();
    seed_parts_tree(temp.path());

    let mut context = RunContext::new();
    let err = context
        .execute(&Commands::Tabulate {
            root: temp.path().to_path_buf(),
            format: "papyrus".to_string(),
        })
        .unwrap_err();
    assert_eq!(exit_code(&err), 1);
}
