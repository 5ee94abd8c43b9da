//! Integration tests for the headless `check` command

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

use super::common::fixtures::{self, TraceDir};

fn traceview(dir: &TraceDir) -> Command {
    let mut cmd = Command::cargo_bin("traceview").expect("binary builds");
    cmd.arg("--data-dir").arg(dir.path.join("data"));
    cmd
}

/// Valid traces report their step counts and exit zero
#[test]
fn test_check_accepts_valid_traces() {
    let dir = TraceDir::new();
    let first = dir.write_trace("first.json", &fixtures::steps(3));
    let second = dir.write_trace(
        "second.json",
        &json!({ "title": "Wrapped", "items": fixtures::steps(5) }),
    );

    traceview(&dir)
        .arg("check")
        .arg(&first)
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok viewer1 3 steps"))
        .stdout(predicate::str::contains("ok viewer2 5 steps"));
}

/// Any rejected trace makes the command fail, one line per trace
#[test]
fn test_check_reports_rejected_traces() {
    let dir = TraceDir::new();
    let good = dir.write_trace("good.json", &fixtures::steps(3));
    let bad = dir.write_trace(
        "bad.json",
        &json!([
            { "index": 0, "action": "a", "screenshotPath": "s/0.png" },
            { "index": 0, "action": "b", "screenshotPath": "s/1.png" },
        ]),
    );

    let output = traceview(&dir)
        .arg("check")
        .arg(format!("good={}", good.display()))
        .arg(format!("bad={}", bad.display()))
        .output()
        .expect("command runs");

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    insta::assert_snapshot!(stdout.trim_end(), @r"
    ok good 3 steps
    error bad: Duplicate step index 0 at position 1
    ");
}

/// Unreadable files name the path in the error
#[test]
fn test_check_missing_file() {
    let dir = TraceDir::new();

    traceview(&dir)
        .args(["check", "--id", "lost"])
        .arg(dir.path.join("nope.json"))
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("error lost: Failed to read trace"))
        .stdout(predicate::str::contains("nope.json"));
}

/// A zero dwell interval is refused before anything is loaded
#[test]
fn test_zero_interval_is_rejected() {
    let dir = TraceDir::new();
    let trace = dir.write_trace("t.json", &fixtures::steps(1));

    traceview(&dir)
        .args(["--interval-ms", "0", "check"])
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--interval-ms must be greater than zero"));
}
