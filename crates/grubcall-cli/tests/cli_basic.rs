//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Only
//! read-only commands are exercised so parallel tests cannot race on the
//! shared snapshot.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "grubcall-cli", "--"])
        .args(args)
        .env("GRUBCALL_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_status() {
    let (stdout, _, code) = run_cli(&["status"]);
    assert_eq!(code, 0, "status failed");
    assert!(stdout.contains("collecting") || stdout.contains("idle"));
}

#[test]
fn test_summary() {
    let (_, _, code) = run_cli(&["summary"]);
    assert_eq!(code, 0, "summary failed");
}

#[test]
fn test_receipt() {
    let (_, _, code) = run_cli(&["receipt"]);
    assert_eq!(code, 0, "receipt failed");
}

#[test]
fn test_config_list_is_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("config list should print JSON");
    assert!(parsed.get("reference_timezone").is_some());
}

#[test]
fn test_config_get() {
    let (_, _, code) = run_cli(&["config", "get", "daily_open_local_time"]);
    assert_eq!(code, 0, "config get failed");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "nonexistent_key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}
