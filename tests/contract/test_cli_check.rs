use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Contract tests for `reqlint check`

#[test]
fn test_check_clean_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\nscipy==1.10.1\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 2 requirement(s)"))
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_check_duplicate_package_fails() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\nnumpy==1.26.0\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("duplicate entry for 'numpy'"))
        .stdout(predicate::str::contains("[duplicate-package]"))
        .stderr(predicate::str::contains("problem(s) found"));
}

#[test]
fn test_check_warnings_do_not_fail() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy>=1.20\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"))
        .stdout(predicate::str::contains("not pinned"))
        .stdout(predicate::str::contains("0 error(s), 1 warning(s)"));
}

#[test]
fn test_check_strict_promotes_warnings() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy>=1.20\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["check", "--strict"])
        .arg(&manifest)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("error"));
}

#[test]
fn test_check_syntax_error_reported_with_line() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n--index-url https://example.invalid\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(":2: error:"))
        .stdout(predicate::str::contains("unsupported option"));
}

#[test]
fn test_check_conflicting_specifiers() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "qualtran==0.4.1, <0.4\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[conflicting-specifiers]"));
}

#[test]
fn test_check_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["check", "--json"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"errors\":0"))
        .stdout(predicate::str::contains("\"findings\":[]"));
}

#[test]
fn test_check_respects_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy>=1.20\n").unwrap();
    fs::write(
        temp_dir.path().join("reqlint.toml"),
        "[rules]\nunpinned = \"off\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_check_unknown_rule_in_config() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n").unwrap();
    fs::write(temp_dir.path().join("reqlint.toml"), "[rules]\nspeling = \"off\"\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown rule 'speling'"));
}

#[test]
fn test_check_missing_file() {
    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["check", "no-such-file.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}
