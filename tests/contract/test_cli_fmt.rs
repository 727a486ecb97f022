use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Contract tests for `reqlint fmt`

#[test]
fn test_fmt_prints_canonical_form() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy == 1.24.3\nscipy >=1.10 , <2.0\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("fmt")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::eq("numpy==1.24.3\nscipy>=1.10, <2.0\n"));
}

#[test]
fn test_fmt_preserves_comments() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "# core stack\nnumpy==1.24.3  # pinned for ABI\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("fmt")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("# core stack"))
        .stdout(predicate::str::contains("# pinned for ABI"));
}

#[test]
fn test_fmt_write_rewrites_file() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy == 1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["fmt", "--write"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewrote"));

    assert_eq!(fs::read_to_string(&manifest).unwrap(), "numpy==1.24.3\n");
}

#[test]
fn test_fmt_write_leaves_canonical_file_alone() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["fmt", "--write"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn test_fmt_check_passes_on_canonical_file() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["fmt", "--check"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("already formatted"));
}

#[test]
fn test_fmt_check_fails_on_unformatted_file() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy == 1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["fmt", "--check"])
        .arg(&manifest)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not formatted"));
}

#[test]
fn test_fmt_sort_orders_blocks() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "scipy==1.10.1\nnumpy==1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["fmt", "--sort"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::eq("numpy==1.24.3\nscipy==1.10.1\n"));
}

#[test]
fn test_fmt_write_and_check_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["fmt", "--write", "--check"])
        .arg(&manifest)
        .assert()
        .failure();
}
