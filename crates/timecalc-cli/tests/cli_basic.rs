//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify outputs. Each test points the
//! CLI at its own config file so nothing touches the user's home.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_timecalc"))
        .env("TIMECALC_CONFIG", config)
        .env_remove("TIMECALC_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_calc_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&cfg, &["calc", "--now", "14:50", "20", "10"]);
    assert_eq!(code, 0, "calc failed");
    assert!(stdout.contains("Resulting Time: 3:20 PM (Added 30 min)"));
    assert!(stdout.contains("Warning: exceeds 3:00 PM at Interval 1 by 10 min"));
}

#[test]
fn test_calc_json() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&cfg, &["calc", "--json", "--now", "09:00", "30", "45"]);
    assert_eq!(code, 0, "calc --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_minutes"], 75);
    assert!(parsed["violation"].is_null());
}

#[test]
fn test_calc_invalid_interval() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, _, stderr) = run_cli(&cfg, &["calc", "--now", "09:00", "10", "999"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid input in Interval 2"));
}

#[test]
fn test_config_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&cfg, &["config", "set", "cutoffs.0.time_of_day", "14:00"]);
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(&cfg, &["config", "get", "cutoffs.0.time_of_day"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "14:00");

    // The new cutoff applies to calc.
    let (_, stdout, _) = run_cli(&cfg, &["calc", "--now", "13:50", "20"]);
    assert!(stdout.contains("at Interval 1 by 10 min"));
}

#[test]
fn test_config_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, _, stderr) = run_cli(&cfg, &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_countdown_requires_valid_first_interval() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, _, stderr) = run_cli(&cfg, &["countdown", "abc"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Nothing to count down"));
}

#[test]
fn test_calc_shows_zone_for_live_clock() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&cfg, &["calc", "10"]);
    assert_eq!(code, 0, "calc failed");
    let line = stdout
        .lines()
        .find(|l| l.starts_with("Current Time: "))
        .expect("no current time line");
    // "Current Time: 3:07 PM +01:00"
    let zone = line.rsplit(' ').next().unwrap();
    assert!(zone.starts_with('+') || zone.starts_with('-'), "{line}");
}

#[test]
fn test_config_written_to_override_path() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&cfg, &["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), cfg.display().to_string());

    let (code, _, _) = run_cli(&cfg, &["config", "set", "countdown.auto_cascade", "false"]);
    assert_eq!(code, 0);
    let saved = std::fs::read_to_string(&cfg).unwrap();
    assert!(saved.contains("auto_cascade = false"));
}
