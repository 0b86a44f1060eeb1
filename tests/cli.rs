use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bdecode"))
}

fn write_input(temp: &TempDir, contents: &[u8]) -> std::path::PathBuf {
    let path = temp.path().join("input.torrent");
    std::fs::write(&path, contents).expect("write input");
    path
}

#[test]
fn decodes_file_to_indented_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_input(&temp, b"d3:cow3:moo4:spaml1:a1:bee");
    let output = temp.path().join("out.json");

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("Decoded data saved to"));

    let text = std::fs::read_to_string(&output).expect("output written");
    assert!(text.contains("\n  \"cow\": \"moo\""));
    let parsed: Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(parsed, json!({"cow": "moo", "spam": ["a", "b"]}));
}

#[test]
fn missing_arguments_print_usage() {
    cmd()
        .assert()
        .success()
        .stdout(contains("Usage:"));

    cmd()
        .arg("only-input.torrent")
        .assert()
        .success()
        .stdout(contains("Usage:"));
}

#[test]
fn decode_error_writes_nothing() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_input(&temp, b"l4:spam");
    let output = temp.path().join("out.json");

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stdout(contains("Error:").and(contains("unterminated list")));
    assert!(!output.exists());
}

#[test]
fn missing_input_reports_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("out.json");

    cmd()
        .arg(temp.path().join("missing.torrent"))
        .arg(&output)
        .assert()
        .failure()
        .stdout(contains("Error: read"));
    assert!(!output.exists());
}

#[test]
fn stdout_and_compact() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_input(&temp, b"li1ei2ee");

    cmd()
        .arg(&input)
        .arg("-")
        .arg("--compact")
        .assert()
        .success()
        .stdout("[1,2]\n");
}

#[test]
fn strict_rejects_trailing_data() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_input(&temp, b"i1ejunk");
    let output = temp.path().join("out.json");

    cmd().arg(&input).arg(&output).assert().success();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "1");

    std::fs::remove_file(&output).unwrap();
    cmd()
        .arg(&input)
        .arg(&output)
        .arg("--strict")
        .assert()
        .failure()
        .stdout(contains("trailing data"));
    assert!(!output.exists());
}

#[test]
fn bytes_policy_flag() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_input(&temp, b"d6:pieces2:\xab\xcde");

    cmd()
        .arg(&input)
        .arg("-")
        .args(["--bytes", "hex", "--compact"])
        .assert()
        .success()
        .stdout("{\"pieces\":\"abcd\"}\n");

    cmd()
        .arg(&input)
        .arg("-")
        .args(["--bytes", "strict"])
        .assert()
        .failure()
        .stdout(contains("$.pieces"));
}

#[test]
fn max_depth_flag() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_input(&temp, b"llleee");

    cmd()
        .arg(&input)
        .arg("-")
        .args(["--max-depth", "2"])
        .assert()
        .failure()
        .stdout(contains("nesting deeper than 2 levels"));
}
