//! End-to-end tests driving the `tc` binary.
//!
//! Tests the full pipeline: punch → log file → report / invoice / status.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const LOG: &str = "\
i 2024-01-01 09:00:00 work  start
p 2024-01-01 10:00:00 work
u 2024-01-01 10:15:00 work
o 2024-01-01 11:00:00 work
i 2024-01-02 14:00:00 work  review
o 2024-01-02 15:30:00 work
i 2024-01-03 08:00:00 admin  email
o 2024-01-03 08:20:00 admin
";

fn tc_binary() -> String {
    env!("CARGO_BIN_EXE_tc").to_string()
}

/// Runs `tc` with an isolated home directory and the given punch log.
fn tc(home: &Path, log: &Path, args: &[&str]) -> Output {
    Command::new(tc_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("COUNTDOWN_LOG_PATH")
        .env_remove("TC_LOG_PATH")
        .env_remove("TC_UNITS")
        .arg("--file")
        .arg(log)
        .args(args)
        .output()
        .expect("failed to run tc")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "tc should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("punches.timeclock");
    std::fs::write(&log, LOG).unwrap();
    (temp, log)
}

/// The paused quarter hour is excluded from the first session.
#[test]
fn test_report_excludes_paused_time() {
    let (temp, log) = setup();
    let output = stdout(&tc(temp.path(), &log, &["report", "--units", "h"]));

    let first = output.lines().nth(1).unwrap();
    assert_eq!(first, "2024-01-01 09:00:00\t2024-01-01 11:00:00\t1.75h\twork");
    assert_eq!(output.lines().count(), 4);
}

#[test]
fn test_report_grouped_by_week_with_tag_filter() {
    let (temp, log) = setup();
    let output = stdout(&tc(
        temp.path(),
        &log,
        &["report", "--tag", "work", "--group", "week", "--units", "m"],
    ));

    assert_eq!(output, "bucket\ttag\tduration\n2024-01\twork\t195m\n");
}

#[test]
fn test_invoice_outputs_json_lines() {
    let (temp, log) = setup();
    let output = stdout(&tc(temp.path(), &log, &["invoice", "--tag", "work"]));

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"date":"2024-01-01","notes":"start","quantity":1.75}"#,
            r#"{"date":"2024-01-02","notes":"review","quantity":1.5}"#,
        ]
    );
}

#[test]
fn test_invoice_requires_tag() {
    let (temp, log) = setup();
    let output = tc(temp.path(), &log, &["invoice"]);
    assert!(!output.status.success());
}

/// An illegal first punch aborts the run with no report output.
#[test]
fn test_illegal_transition_fails_without_output() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("bad.timeclock");
    std::fs::write(&log, "p 2024-01-01 09:00:00 work\n").unwrap();

    let output = tc(temp.path(), &log, &["report"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 0"), "stderr: {stderr}");
}

#[test]
fn test_invalid_month_is_rejected() {
    let (temp, log) = setup();
    let output = tc(temp.path(), &log, &["report", "--begin", "2024-1"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_punch_then_report() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("new.timeclock");

    for args in [
        ["punch", "i", "acme", "--at", "2024-03-01 09:00:00"],
        ["punch", "p", "acme", "--at", "2024-03-01 09:30:00"],
        ["punch", "u", "acme", "--at", "2024-03-01 10:00:00"],
        ["punch", "o", "acme", "--at", "2024-03-01 10:30:00"],
    ] {
        stdout(&tc(temp.path(), &log, &args));
    }

    let output = stdout(&tc(temp.path(), &log, &["report", "-g", "day", "-u", "m"]));
    assert_eq!(output, "bucket\ttag\tduration\n2024-03-01\tacme\t60m\n");

    let status = stdout(&tc(temp.path(), &log, &["status"]));
    assert!(status.contains("Timer: idle"));
    assert!(status.contains("Sessions: 1"));
}

#[test]
fn test_illegal_punch_is_refused() {
    let (temp, log) = setup();
    let output = tc(temp.path(), &log, &["punch", "u", "work"]);
    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(&log).unwrap(), LOG);
}

#[test]
fn test_log_path_from_environment() {
    let (temp, log) = setup();
    let output = Command::new(tc_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("COUNTDOWN_LOG_PATH")
        .env("TC_LOG_PATH", &log)
        .env("TC_UNITS", "h")
        .arg("report")
        .arg("--group")
        .arg("year")
        .output()
        .unwrap();

    assert_eq!(
        stdout(&output),
        "bucket\ttag\tduration\n2024\tadmin\t0.33h\n2024\twork\t3.25h\n"
    );
}
