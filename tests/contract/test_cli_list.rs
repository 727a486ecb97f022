use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Contract tests for `reqlint list`

fn write_manifest(dir: &TempDir) -> std::path::PathBuf {
    let manifest = dir.path().join("requirements.txt");
    fs::write(
        &manifest,
        "# numerics\nnumpy==1.24.3\nscipy>=1.10\nrequests\n",
    )
    .unwrap();
    manifest
}

#[test]
fn test_list_all() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(&temp_dir);

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("list")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("numpy==1.24.3"))
        .stdout(predicate::str::contains("scipy>=1.10"))
        .stdout(predicate::str::contains("requests"))
        .stdout(predicate::str::contains("3 requirement(s)"));
}

#[test]
fn test_list_pinned_only() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(&temp_dir);

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["list", "--pinned"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("numpy==1.24.3"))
        .stdout(predicate::str::contains("scipy").not())
        .stdout(predicate::str::contains("1 requirement(s)"));
}

#[test]
fn test_list_unconstrained_only() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(&temp_dir);

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["list", "--unconstrained"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("requests"))
        .stdout(predicate::str::contains("numpy").not())
        .stdout(predicate::str::contains("1 requirement(s)"));
}

#[test]
fn test_list_pinned_and_unconstrained_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(&temp_dir);

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["list", "--pinned", "--unconstrained"])
        .arg(&manifest)
        .assert()
        .failure();
}

#[test]
fn test_list_annotates_included_entries() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("base.txt"), "flask==3.0.0\n").unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "-r base.txt\nnumpy==1.24.3\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("list")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("flask==3.0.0  (from"))
        .stdout(predicate::str::contains("2 requirement(s)"));
}

#[test]
fn test_list_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(&temp_dir);

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["list", "--json"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"requirements\""))
        .stdout(predicate::str::contains("\"name\":\"numpy\""))
        .stdout(predicate::str::contains("\"pinned\":true"));
}

#[test]
fn test_list_parse_error_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n-e .\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("list")
        .arg(&manifest)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unsupported option"));
}
