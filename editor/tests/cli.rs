//! CLI tests for `rule-editor`.
//!
//! Spawns the binary against a scaffolded `.rule-editor/` directory and checks
//! exit codes and persisted documents.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use rule_editor::core::catalog::Catalog;
use rule_editor::exit_codes;
use rule_editor::io::config::{EditorConfig, load_config, write_config};
use rule_editor::io::document_store::{load_document, write_document};
use rule_editor::io::init::{EditorPaths, InitOptions, init_editor};
use rule_editor::test_support::{assign, loop_document, sample_catalog};

fn init(root: &Path) -> EditorPaths {
    init_editor(
        root,
        &InitOptions {
            force: false,
            loop_rule: true,
        },
    )
    .expect("init")
}

fn rule_editor(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rule-editor"))
        .current_dir(root)
        .args(args)
        .output()
        .expect("rule-editor")
}

fn write_catalog(paths: &EditorPaths, cfg: &EditorConfig, catalog: &Catalog) {
    let contents = serde_json::to_string_pretty(catalog).expect("json");
    fs::write(paths.catalog_path(cfg), contents).expect("write catalog");
}

#[test]
fn init_then_validate_succeeds() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = rule_editor(temp.path(), &["init", "--loop"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let output = rule_editor(temp.path(), &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn validate_reports_invalid_documents() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init(temp.path());
    let cfg = load_config(&paths.config_path).expect("config");
    let mut doc = loop_document(&["rule-1"]);
    doc.start_actions.push(assign("dup"));
    doc.end_actions.push(assign("dup"));
    write_document(&paths.document_path(&cfg), &doc, true).expect("write");

    let output = rule_editor(temp.path(), &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate id 'dup'"));
}

#[test]
fn apply_persists_changes_and_reports_rejections() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init(temp.path());
    let cfg = load_config(&paths.config_path).expect("config");
    let commands = temp.path().join("commands.jsonl");
    fs::write(
        &commands,
        concat!(
            "{\"type\":\"decisionSet/setName\",\"payload\":{\"name\":\"Bonus\"}}\n",
            "{\"type\":\"decisionSet/teleport\"}\n",
            "{\"type\":\"decisionSet/addUnitRule\"}\n",
        ),
    )
    .expect("write commands");

    let output = rule_editor(temp.path(), &["apply", "commands.jsonl"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("summary");
    assert_eq!(summary["changed"], 2);
    assert_eq!(summary["rejections"][0]["index"], 2);

    let stored = load_document(&paths.document_path(&cfg)).expect("load");
    assert_eq!(stored.document.attrs.name, "Bonus");
    assert_eq!(stored.document.condition_rules.len(), 2);
}

#[test]
fn strict_apply_exits_with_rejected_code_and_dry_run_keeps_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init(temp.path());
    let cfg = EditorConfig {
        strict: true,
        ..EditorConfig::default()
    };
    write_config(&paths.config_path, &cfg).expect("config");
    let before = fs::read_to_string(paths.document_path(&cfg)).expect("read");

    let commands = temp.path().join("commands.json");
    fs::write(
        &commands,
        r#"[{"type":"decisionSet/deleteUnitRule","payload":{"id":"rule-1"}}]"#,
    )
    .expect("write commands");

    let output = rule_editor(temp.path(), &["apply", "commands.json", "--dry-run"]);
    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    let after = fs::read_to_string(paths.document_path(&cfg)).expect("read");
    assert_eq!(before, after);
}

#[test]
fn refs_exit_code_tracks_dangling_references() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init(temp.path());
    let cfg = load_config(&paths.config_path).expect("config");
    write_catalog(&paths, &cfg, &sample_catalog());

    let output = rule_editor(temp.path(), &["refs"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let mut doc = loop_document(&["rule-1"]);
    doc.end_actions.push(assign("a"));
    write_document(&paths.document_path(&cfg), &doc, true).expect("write");
    write_catalog(&paths, &cfg, &Catalog::default());

    let output = rule_editor(temp.path(), &["refs"]);
    assert_eq!(output.status.code(), Some(exit_codes::DANGLING));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("report");
    assert_eq!(report["dangling"][0]["location"], "endActions/a");
    assert_eq!(report["dangling"][0]["id"], "var.total");
}

#[test]
fn options_lists_every_kind() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init(temp.path());
    let cfg = load_config(&paths.config_path).expect("config");
    write_catalog(&paths, &cfg, &sample_catalog());

    let output = rule_editor(temp.path(), &["options"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let options: serde_json::Value = serde_json::from_slice(&output.stdout).expect("options");
    let labels: Vec<&str> = options
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|option| option["label"].as_str())
        .collect();
    assert_eq!(labels, vec!["Input value", "Variable", "Constant", "Function"]);
}

#[test]
fn normalize_repairs_loose_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("loose.json");
    fs::write(&input, r#"{ "startActions": "oops" }"#).expect("write");

    let output = rule_editor(temp.path(), &["normalize", "loose.json", "-o", "clean.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stderr).contains("repaired"));
    let clean = load_document(&temp.path().join("clean.json")).expect("load");
    assert!(clean.repairs.is_empty());
    assert_eq!(clean.document.condition_rules.len(), 1);
}
