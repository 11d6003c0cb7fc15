//! Integration tests for the `bundlewatch` CLI binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! config handling — all without a live carrier API or usage monitor.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `bundlewatch` binary with env isolation.
fn bundlewatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bundlewatch");
    cmd.env("HOME", "/tmp/bundlewatch-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bundlewatch-test-nonexistent")
        .env_remove("BUNDLEWATCH_CONFIG")
        .env_remove("BUNDLEWATCH_HOST")
        .env_remove("BUNDLEWATCH_USERNAME")
        .env_remove("BUNDLEWATCH_PASSWORD");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

/// Concatenate stdout + stderr for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

#[test]
fn test_no_args_shows_help() {
    let output = bundlewatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage':\n{text}");
}

#[test]
fn test_help_flag() {
    bundlewatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("data balances")
            .and(predicate::str::contains("summary"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    bundlewatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundlewatch"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    bundlewatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config handling ─────────────────────────────────────────────────

#[test]
fn test_summary_without_config_fails_with_usage_code() {
    let output = bundlewatch_cmd().arg("summary").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config"),
        "Expected config hint in stderr:\n{stderr}"
    );
}

#[test]
fn test_config_path_prints_a_location() {
    bundlewatch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_writes_a_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    bundlewatch_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "init"])
        .assert()
        .success();

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("msisdn"));
    assert!(body.contains("monitor"));

    // Without --force a second init must refuse to overwrite.
    bundlewatch_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "init"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_output_format_rejected() {
    bundlewatch_cmd()
        .args(["summary", "--output", "xml"])
        .assert()
        .failure()
        .code(2);
}
