//! CLI integration tests for ora-insert-export.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the ora-insert-export binary.
fn cmd() -> Command {
    Command::cargo_bin("ora-insert-export").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("health-check"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_run_subcommand_help() {
    cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--layout"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ora-insert-export"));
}

#[test]
fn test_verbosity_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_config_default_path() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_io_code() {
    // Missing file is an IO error (code 7), not a config error (code 1)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "health-check"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_config_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_config_code() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // Empty file is invalid YAML config

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_config_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    // Valid YAML but missing required config fields
    writeln!(file, "source:").unwrap();
    writeln!(file, "  host: somehost").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_config_without_tables_exits_with_config_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "source:").unwrap();
    writeln!(file, "  host: h").unwrap();
    writeln!(file, "  service: s").unwrap();
    writeln!(file, "  user: u").unwrap();
    writeln!(file, "  password: p").unwrap();
    writeln!(file, "tables: []").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least one table"));
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_writes_sample_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    cmd()
        .args(["init", "--output", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote sample configuration"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("source:"));
    assert!(content.contains("tables:"));
}

#[test]
fn test_init_refuses_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "keep me").unwrap();

    cmd()
        .args(["init", "--output", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
}

#[test]
fn test_init_force_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "old").unwrap();

    cmd()
        .args(["init", "--force", "--output", path.to_str().unwrap()])
        .assert()
        .success();

    assert!(std::fs::read_to_string(&path).unwrap().contains("source:"));
}

// =============================================================================
// No Subcommand Tests
// =============================================================================

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_health_check_command_exists() {
    cmd()
        .args(["health-check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test the source database connection"));
}
