//! Integration test: the `typhaon` binary's output and exit codes.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SCHEMA: &str = r#"{"fields": [
    {"name": "id", "type": "string"},
    {"name": "colour", "type": "enum", "symbols": ["RED", "GREEN", "BLUE"]}
]}"#;

fn typhaon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typhaon"))
        .args(args)
        .output()
        .unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn all_records_pass() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "schema.json", SCHEMA);
    let records = write(
        dir.path(),
        "rows.jsonl",
        "{\"id\": \"a\", \"colour\": \"RED\"}\n{\"id\": \"b\", \"colour\": \"BLUE\"}\n",
    );

    let output = typhaon(&["validate", "--schema", schema.to_str().unwrap(), records.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("OK: "), "{out}");
    assert!(out.contains("Records: 2/2 passed"), "{out}");
}

#[test]
fn failing_record_exits_one_with_diagnostics() {
    let dir = TempDir::new().unwrap();
    let records = write(
        dir.path(),
        "rows.json",
        r#"[{"id": "a", "colour": "RED"}, {"id": "b", "colour": "PINK"}]"#,
    );

    let output = typhaon(&["validate", "--schema", SCHEMA, "--quiet", records.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(!out.contains("OK: "), "{out}");
    assert!(out.contains("FAIL: "), "{out}");
    assert!(
        out.contains("'colour' (PINK) did not pass validator enum (RED, GREEN, BLUE)."),
        "{out}"
    );
    assert!(out.contains("Records: 1/2 passed"), "{out}");
}

#[test]
fn strict_aborts_on_first_failure() {
    let dir = TempDir::new().unwrap();
    let records = write(
        dir.path(),
        "rows.yaml",
        "- id: 1\n  colour: RED\n- id: b\n  colour: GREEN\n",
    );

    let output = typhaon(&["validate", "--schema", SCHEMA, "--strict", records.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Aborted"), "{out}");
    assert!(out.contains("Records: 0/1 passed"), "{out}");
}

#[test]
fn bad_schema_exits_two() {
    let dir = TempDir::new().unwrap();
    let records = write(dir.path(), "rows.json", r#"{"id": "a"}"#);
    let output = typhaon(&[
        "validate",
        "--schema",
        r#"{"fields": [{"name": "id", "type": "widget"}]}"#,
        records.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("widget"), "{err}");
}

#[test]
fn unreadable_records_exit_two() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    let output = typhaon(&["validate", "--schema", SCHEMA, missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn check_schema_lists_rules() {
    let output = typhaon(&["check-schema", SCHEMA]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Schema: 2 field(s)"), "{out}");
    assert!(out.contains("  colour: enum (RED, GREEN, BLUE)"), "{out}");
    assert!(out.contains("  id: string"), "{out}");
}
