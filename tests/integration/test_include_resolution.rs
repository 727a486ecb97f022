use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// End-to-end scenarios for -r include handling

#[test]
fn test_check_walks_nested_includes() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("env")).unwrap();
    fs::write(temp_dir.path().join("env/ci.txt"), "pytest==7.4.0\n").unwrap();
    fs::write(
        temp_dir.path().join("env/dev.txt"),
        "-r ci.txt\nblack==23.7.0\n",
    )
    .unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n-r env/dev.txt\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 3 requirement(s) across 3 file(s)"));
}

#[test]
fn test_check_finds_duplicates_across_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("base.txt"), "numpy==1.26.0\n").unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n-r base.txt\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("duplicate entry for 'numpy'"))
        .stdout(predicate::str::contains("base.txt"));
}

#[test]
fn test_check_no_follow_sees_only_the_root() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("base.txt"), "numpy==1.26.0\n").unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "numpy==1.24.3\n-r base.txt\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.args(["check", "--no-follow"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 requirement(s)"));
}

#[test]
fn test_check_reports_include_cycle() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "-r b.txt\n").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "-r a.txt\n").unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "-r a.txt\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn test_check_reports_missing_include() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "-r missing.txt\n").unwrap();

    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("missing.txt"))
        .stderr(predicate::str::contains("requirements.txt"));
}

#[test]
fn test_diamond_include_counted_once() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("shared.txt"), "numpy==1.24.3\n").unwrap();
    fs::write(temp_dir.path().join("a.txt"), "-r shared.txt\n").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "-r shared.txt\n").unwrap();
    let manifest = temp_dir.path().join("requirements.txt");
    fs::write(&manifest, "-r a.txt\n-r b.txt\n").unwrap();

    // numpy is read once, so there is no duplicate finding
    let mut cmd = Command::cargo_bin("reqlint").unwrap();
    cmd.arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 requirement(s) across 4 file(s)"));
}
