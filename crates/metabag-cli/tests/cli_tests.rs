//! Integration tests for the `metabag` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the encode,
//! decode and inspect subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, error reporting, and roundtrip correctness.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

/// Helper: path to the plain sample.json fixture.
fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

/// Helper: path to the tagged.json fixture.
fn tagged_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tagged.json")
}

/// Helper: path to the mismatch.json fixture (tag with a wrong payload).
fn mismatch_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/mismatch.json")
}

/// Helper: read the sample.json fixture as a string.
fn sample_json() -> String {
    std::fs::read_to_string(sample_json_path()).expect("sample.json fixture must exist")
}

/// Helper: run the binary with `args` and `stdin`, returning stdout.
fn run_stdout(args: &[&str], stdin: &str) -> String {
    let output = Command::cargo_bin("metabag")
        .unwrap()
        .args(args)
        .write_stdin(stdin)
        .output()
        .expect("failed to run metabag");
    assert!(output.status.success(), "metabag {:?} failed", args);
    String::from_utf8(output.stdout).expect("stdout must be UTF-8")
}

/// Helper: a per-test output path under the system temp directory.
fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("metabag-test-{}-{}", std::process::id(), name))
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_stdin_to_stdout() {
    let out = run_stdout(&["encode"], r#"{"title":"Voyager","season":3}"#);
    assert_eq!(out, r#"{"season":{"int":3},"title":{"string":"Voyager"}}"#);
}

#[test]
fn encode_dash_input_reads_stdin() {
    let out = run_stdout(&["encode", "-i", "-"], r#"{"tags":["series"]}"#);
    assert_eq!(out, r#"{"tags":{"array":[{"string":"series"}]}}"#);
}

#[test]
fn encode_file_to_stdout() {
    Command::cargo_bin("metabag")
        .unwrap()
        .args(["encode", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title":{"string":"Voyager"}"#))
        .stdout(predicate::str::contains(r#""season":{"int":3}"#))
        .stdout(predicate::str::contains(r#""notes":{"nil":null}"#));
}

#[test]
fn encode_file_to_file() {
    let output_path = temp_path("encode.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("metabag")
        .unwrap()
        .args(["encode", "-i", sample_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["isFeatured"], json!({"bool": true}));
    assert_eq!(parsed["ratings"]["array"][0]["object"]["score"], json!({"double": 8.7}));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn encode_pretty_is_indented() {
    let out = run_stdout(&["encode", "--pretty"], r#"{"a":1}"#);
    assert!(out.contains('\n'));
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, json!({"a": {"int": 1}}));
}

#[test]
fn encode_root_scalar() {
    assert_eq!(run_stdout(&["encode"], "2.5"), r#"{"double":2.5}"#);
}

#[test]
fn encode_invalid_json_fails() {
    Command::cargo_bin("metabag")
        .unwrap()
        .arg("encode")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to encode JSON"));
}

#[test]
fn encode_missing_file_fails() {
    Command::cargo_bin("metabag")
        .unwrap()
        .args(["encode", "-i", "/nonexistent/metabag/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_tagged_file() {
    let output = Command::cargo_bin("metabag")
        .unwrap()
        .args(["decode", "-i", tagged_json_path()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        json!({
            "model": "orca-mini",
            "maxTokens": 1024,
            "config": {"temperature": 0.2, "tools": ["search", "execute"]},
            "notes": null
        })
    );
}

#[test]
fn decode_pretty_prints_by_default() {
    let out = run_stdout(&["decode"], r#"{"a":{"int":1}}"#);
    assert!(out.contains('\n'));
}

#[test]
fn decode_compact() {
    assert_eq!(
        run_stdout(&["decode", "--compact"], r#"{"a":{"int":1},"b":[1,{"string":"x"}]}"#),
        r#"{"a":1,"b":[1,"x"]}"#
    );
}

#[test]
fn decode_plain_fragment() {
    assert_eq!(run_stdout(&["decode", "--compact"], r#""Voyager""#), r#""Voyager""#);
}

#[test]
fn decode_to_file() {
    let output_path = temp_path("decode.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("metabag")
        .unwrap()
        .args(["decode", "-i", tagged_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["maxTokens"], json!(1024));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn decode_type_mismatch_reports_path() {
    Command::cargo_bin("metabag")
        .unwrap()
        .args(["decode", "-i", mismatch_json_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode metadata"))
        .stderr(predicate::str::contains("$.title.string"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Inspect subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn inspect_lists_keys_and_types() {
    Command::cargo_bin("metabag")
        .unwrap()
        .args(["inspect", "-i", tagged_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("model: string"))
        .stdout(predicate::str::contains("maxTokens: int"))
        .stdout(predicate::str::contains("config: object{2}"))
        .stdout(predicate::str::contains("notes: nil"));
}

#[test]
fn inspect_plain_document() {
    let out = run_stdout(&["inspect"], &sample_json());
    assert!(out.contains("tags: array[2]"));
    assert!(out.contains("isFeatured: bool"));
    assert!(out.contains("details: object{2}"));
}

#[test]
fn inspect_empty_document() {
    assert_eq!(run_stdout(&["inspect"], "{}"), "(empty)\n");
}

#[test]
fn inspect_rejects_non_object_root() {
    Command::cargo_bin("metabag")
        .unwrap()
        .arg("inspect")
        .write_stdin("[1, 2]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected object"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Roundtrip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_then_decode_roundtrip() {
    let tagged = run_stdout(&["encode"], &sample_json());
    let plain = run_stdout(&["decode"], &tagged);

    let original: serde_json::Value = serde_json::from_str(&sample_json()).unwrap();
    let roundtripped: serde_json::Value = serde_json::from_str(&plain).unwrap();
    assert_eq!(original, roundtripped);
    assert!(roundtripped["details"]["season"].is_i64());
}

// ─────────────────────────────────────────────────────────────────────────────
// Help / logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("metabag")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    let output = Command::cargo_bin("metabag")
        .unwrap()
        .args(["--verbose", "decode", "--compact"])
        .write_stdin(r#"["ok", {"string": 1}]"#)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("array trial rejected"));
}
