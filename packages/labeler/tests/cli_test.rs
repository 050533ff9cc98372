//! Integration tests for the CLI commands.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_eurlex-labeler"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_label_help() {
    cli()
        .args(["label", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("train_data.tsv"));
}

#[test]
fn test_label_writes_training_file() {
    let output = TempDir::new().unwrap();

    cli()
        .arg("label")
        .arg(fixture("exports"))
        .arg(output.path())
        .args(["--jobs", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Labeled: 3 (2 accepted, 1 rejected)"))
        .stdout(predicate::str::contains("eurovoc-accept"));

    let written = fs::read_to_string(output.path().join("train_data.tsv")).unwrap();
    assert_eq!(written.lines().count(), 3);
    assert!(written.lines().all(|l| l.split('\t').count() == 4));
}

#[test]
fn test_label_fails_when_output_exists() {
    let output = TempDir::new().unwrap();
    fs::write(output.path().join("train_data.tsv"), "").unwrap();

    cli()
        .arg("label")
        .arg(fixture("exports"))
        .arg(output.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_label_with_rules_file() {
    let output = TempDir::new().unwrap();
    let rules = output.path().join("rules.yaml");
    fs::write(
        &rules,
        r#"
rejected_directory_codes:
  codes: ["08"]
  match: prefix
accepted_eurovoc:
  insurance: "3151"
  money laundering: "5465"
"#,
    )
    .unwrap();
    let out_dir = output.path().join("out");

    // Without an author rule the directive falls through to the 0812 reject.
    cli()
        .arg("label")
        .arg(fixture("exports"))
        .arg(&out_dir)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 accepted, 2 rejected)"));
}

#[test]
fn test_label_rejects_invalid_rules_file() {
    let output = TempDir::new().unwrap();
    let rules = output.path().join("rules.yaml");
    fs::write(&rules, "unknown_rule: true\n").unwrap();

    cli()
        .arg("label")
        .arg(fixture("exports"))
        .arg(output.path().join("out"))
        .arg("--rules")
        .arg(&rules)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_segment_html() {
    cli()
        .arg("segment")
        .arg(fixture("directive.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("6 articles, 4 after annex trimming"))
        .stdout(predicate::str::contains("Article 2"))
        .stdout(predicate::str::contains("Text after the annex").not());
}

#[test]
fn test_segment_keep_annexes() {
    cli()
        .arg("segment")
        .arg(fixture("directive.html"))
        .arg("--keep-annexes")
        .assert()
        .success()
        .stdout(predicate::str::contains("ANNEX I"))
        .stdout(predicate::str::contains("Text after the annex"));
}

#[test]
fn test_decode_training_file() {
    let output = TempDir::new().unwrap();
    cli()
        .arg("label")
        .arg(fixture("exports"))
        .arg(output.path())
        .assert()
        .success();

    let training = output.path().join("train_data.tsv");
    let mut rows = fs::read_to_string(&training).unwrap();
    rows.push_str("not-base64!\taccepted\t1\tBROKEN\n");
    fs::write(&training, rows).unwrap();

    cli()
        .arg("decode")
        .arg(&training)
        .assert()
        .success()
        .stdout(predicate::str::contains("32019R2088"))
        .stdout(predicate::str::contains("Decoded: 3"))
        .stdout(predicate::str::contains("Skipped: 1"));
}

#[test]
fn test_missing_input_dir() {
    let output = TempDir::new().unwrap();

    cli()
        .arg("label")
        .arg(output.path().join("does-not-exist"))
        .arg(output.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_rules_prints_builtin_configuration() {
    cli()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted_departments"))
        .stdout(predicate::str::contains("FISMA"))
        .stdout(predicate::str::contains("eurovoc_threshold: 2"));
}
