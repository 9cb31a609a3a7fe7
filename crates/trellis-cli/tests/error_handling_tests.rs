//! Tests for error handling, suggestions and exit codes.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn trellis(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn existing_directory_is_refused() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("demo")).unwrap();

    trellis(temp.path())
        .args(["new", "demo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn force_generates_into_existing_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("demo")).unwrap();

    trellis(temp.path())
        .args(["new", "demo", "--force"])
        .assert()
        .success();
    assert!(temp.path().join("demo/Cargo.toml").is_file());
}

#[test]
fn update_of_missing_directory_is_not_found() {
    let temp = TempDir::new().unwrap();
    trellis(temp.path())
        .args(["update", "nowhere"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn update_of_foreign_project_is_not_found() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("foreign");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("Cargo.toml"), "[package]\nname = \"foreign\"\n").unwrap();

    trellis(temp.path())
        .args(["update", "foreign"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No tool version recorded"));
}

#[test]
fn unknown_extension_flag_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    trellis(temp.path())
        .args(["new", "demo", "--docker"])
        .assert()
        .code(2);
    assert!(!temp.path().join("demo").exists());
}

#[test]
fn unknown_configured_extension_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("trellis.toml");
    fs::write(&config, "[defaults]\nextensions = [\"docker\"]\n").unwrap();

    trellis(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["new", "demo"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown extension(s): docker"));
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    trellis(temp.path())
        .args(["--config", "absent.toml", "extensions"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unknown_config_key_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    trellis(temp.path())
        .args(["config", "get", "defaults.nothing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("trellis.toml");
    fs::write(&config, "[defaults]\n").unwrap();

    trellis(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    trellis(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn failing_step_is_named() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("demo")).unwrap();

    trellis(temp.path())
        .args(["new", "demo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: Directory"))
        .stderr(predicate::str::contains("in action `verify_project_dir`"));
}

#[test]
fn verbose_shows_underlying_causes() {
    let temp = TempDir::new().unwrap();

    trellis(temp.path())
        .args(["--config", "absent.toml", "extensions"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Caused by").not())
        .stderr(predicate::str::contains("run with -v"));

    trellis(temp.path())
        .args(["-v", "--config", "absent.toml", "extensions"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Caused by"));
}
