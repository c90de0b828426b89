//! End-to-end tests for the `wl` binary against a fixture issue file.
//!
//! The fixture holds two issues worked on 2024-03-04 (40 and 20 minutes), one
//! issue assigned to someone else and one without history.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn wl_binary() -> String {
    env!("CARGO_BIN_EXE_wl").to_string()
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/issues.json")
}

/// Write a config file using the fixture source and a one-hour daily meeting.
fn write_config(dir: &Path, worklog_url: &str) -> PathBuf {
    let config_path = dir.join("config.toml");
    let contents = format!(
        r#"
timezone = "Europe/Warsaw"
start_hour = 9
work_hours = 8
source = "file"
fixture_path = "{fixture}"

[jira]
assignee_name = "jdoe"
status_field = "status"
start_work_status = "In Progress"
stop_work_status_primary = "Code Review"
stop_work_status_secondary = "Done"

[worklog]
base_url = "{worklog_url}"
project_id = 7
auth = "Token abc"

[meetings]
sprint = "weekly"
daily_events = [{{ title = "Standup", work_time = 60 }}]
"#,
        fixture = fixture_path().display(),
    );
    std::fs::write(&config_path, contents).unwrap();
    config_path
}

/// Run `wl` with an isolated HOME, feeding `stdin` to the process.
fn run_wl(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(wl_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn wl");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();

    child.wait_with_output().expect("failed to wait for wl")
}

#[test]
fn test_log_prints_summary_and_aborts_on_no() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(temp.path(), &["--config", config, "log", "--when", "2024-03-04"], "n\n");

    assert!(
        output.status.success(),
        "wl log should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4h 40m - WL-1 Fix login"), "stdout: {stdout}");
    assert!(stdout.contains("2h 20m - WL-2 Write docs"), "stdout: {stdout}");
    assert!(stdout.contains("1h 0m - Standup"), "stdout: {stdout}");
    assert!(stdout.contains("7h 0m - WL-1, WL-2"), "stdout: {stdout}");
    assert!(!stdout.contains("WL-3"), "foreign issue leaked: {stdout}");
    assert!(stdout.contains("Aborted"), "stdout: {stdout}");
}

#[test]
fn test_log_closed_stdin_logs_nothing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(temp.path(), &["--config", config, "log", "--when", "2024-03-04"], "");

    assert!(
        output.status.success(),
        "closed stdin should abort cleanly: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Aborted"), "stdout: {stdout}");
    assert!(!stdout.contains("Logging work time"), "stdout: {stdout}");
    assert!(!stderr.contains("failed to post work log"), "stderr: {stderr}");
}

#[test]
fn test_log_with_override_meeting() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(
        temp.path(),
        &[
            "--config",
            config,
            "log",
            "--when",
            "2024-03-04",
            "--override-meeting",
            "Offsite:240",
        ],
        "no\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2h 40m - WL-1 Fix login"), "stdout: {stdout}");
    assert!(stdout.contains("1h 20m - WL-2 Write docs"), "stdout: {stdout}");
    assert!(stdout.contains("4h 0m - Offsite"), "stdout: {stdout}");
    assert!(!stdout.contains("Standup"), "stdout: {stdout}");
}

#[test]
fn test_log_unknown_answer_logs_nothing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(temp.path(), &["--config", config, "log", "-w", "2024-03-04"], "perhaps\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unknown answer"), "stdout: {stdout}");
    assert!(!stdout.contains("Logged"), "stdout: {stdout}");
}

#[test]
fn test_log_day_without_work_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(temp.path(), &["--config", config, "log", "--when", "2024-03-05"], "");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no tasks to log"), "stderr: {stderr}");
}

#[test]
fn test_log_weekend_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(temp.path(), &["--config", config, "log", "--when", "2024-03-09"], "");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("weekend"), "stderr: {stderr}");
}

#[test]
fn test_log_yolo_reports_unreachable_endpoint() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(
        temp.path(),
        &["--config", config, "log", "--when", "2024-03-04", "--yolo"],
        "",
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("Proceed with logging"), "yolo should not prompt: {stdout}");
    assert!(stderr.contains("failed to post work log"), "stderr: {stderr}");
}

#[test]
fn test_missing_required_setting_fails() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(&config_path, "timezone = \"UTC\"\nsource = \"file\"\n").unwrap();

    let output = run_wl(
        temp.path(),
        &["--config", config_path.to_str().unwrap(), "log"],
        "",
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing required setting"), "stderr: {stderr}");
}

#[test]
fn test_meetings_command() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:1");
    let config = config.to_str().unwrap();

    let output = run_wl(temp.path(), &["--config", config, "meetings", "--when", "2024-03-04"], "");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Meetings on 2024-03-04 (Monday)"), "stdout: {stdout}");
    assert!(stdout.contains("Total: 1h 0m"), "stdout: {stdout}");
}
