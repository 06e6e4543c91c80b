//! End-to-end tests for the envpin CLI
//!
//! These tests verify:
//! - Argument validation and flag conflicts
//! - Preflight refusals with the right messages and exit codes
//!
//! Every case here fails before the base interpreter or installer would
//! be invoked, so no interpreter is needed to run the suite.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn envpin() -> Command {
    Command::cargo_bin("envpin").expect("binary under test")
}

fn project() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

#[test]
fn test_help_lists_surface() {
    envpin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--update"))
        .stdout(predicate::str::contains("--reinstall"))
        .stdout(predicate::str::contains("--entrypoint"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_package_argument_is_required() {
    envpin().assert().failure();
}

#[test]
fn test_update_conflicts_with_reinstall() {
    envpin()
        .args(["combine", "--update", "--reinstall"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_quiet_conflicts_with_debug() {
    envpin()
        .args(["combine", "--quiet", "--debug"])
        .assert()
        .failure();
}

#[test]
fn test_update_in_empty_directory_is_refused() {
    let dir = project();
    envpin()
        .args(["combine", "--update"])
        .arg("--path").arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("requirements.txt"));
}

#[test]
fn test_existing_installation_requires_a_flag() {
    let dir = project();
    fs::create_dir_all(dir.path().join(".venv")).unwrap();
    fs::write(dir.path().join("requirements.txt"), "combine==2.2.1\n").unwrap();

    envpin()
        .arg("combine")
        .arg("--path").arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--update"))
        .stderr(predicate::str::contains("--reinstall"));

    // The refusal must leave the manifest untouched
    let manifest = fs::read_to_string(dir.path().join("requirements.txt")).unwrap();
    assert_eq!(manifest, "combine==2.2.1\n");
}

#[test]
fn test_env_without_manifest_is_refused() {
    let dir = project();
    fs::create_dir_all(dir.path().join(".venv")).unwrap();

    envpin()
        .arg("combine")
        .arg("--path").arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("may not be a managed installation"));
}

#[test]
fn test_foreign_workflow_is_refused() {
    let dir = project();
    fs::write(dir.path().join("pyproject.toml"), "[tool.poetry]\n").unwrap();

    envpin()
        .arg("combine")
        .arg("--path").arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("poetry update"));
}

#[test]
fn test_invalid_specifier_is_refused() {
    envpin()
        .arg("==2.2.1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid package specifier"));
}
