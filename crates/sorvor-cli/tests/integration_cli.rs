//! End-to-end tests of the `sorvor` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sorvor() -> Command {
    let mut cmd = Command::cargo_bin("sorvor").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_lists_commands() {
    sorvor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("build"));
}

#[test]
fn test_dev_rejects_port_zero() {
    sorvor()
        .args(["dev", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0"));
}

#[test]
fn test_build_missing_entry() {
    let temp = TempDir::new().unwrap();

    sorvor()
        .args(["build", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry point not found"));
}

#[test]
fn test_build_missing_bundler() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("main.js"), "console.log(1)").unwrap();

    sorvor()
        .args(["build", "main.js", "--bundler", "sorvor-test-no-such-bundler", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("sorvor-test-no-such-bundler"));
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("sorvor.config.json"), r#"{ "port": "many" }"#).unwrap();

    sorvor()
        .args(["build", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}
