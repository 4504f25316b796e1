//! End-to-end tests that drive the `ti` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn ti_binary() -> String {
    env!("CARGO_BIN_EXE_ti").to_string()
}

/// A command isolated from the user's real config directory.
fn ti(home: &Path) -> Command {
    let mut cmd = Command::new(ti_binary());
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("TI_INITIAL_ROWS")
        .env_remove("TI_TICK_INTERVAL_MS");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn ti");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "ti should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_replay_file_accrues_and_pauses() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("session.ti");
    std::fs::write(
        &script,
        "rename 1 Writing\n\
         toggle 1\n\
         advance 61000\n\
         pause\n\
         advance 30000\n\
         caption\n\
         json\n",
    )
    .unwrap();

    let output = ti(temp.path())
        .env("TI_INITIAL_ROWS", "2")
        .arg("replay")
        .arg(&script)
        .output()
        .unwrap();
    let out = stdout(&output);

    let (caption, json) = out.split_once('\n').unwrap();
    assert_eq!(caption, "TimeIt [Paused]");

    let snapshot: serde_json::Value = serde_json::from_str(json).unwrap();
    let rows = snapshot["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Writing");
    assert_eq!(rows[0]["elapsed"], "0:01:01");
    assert_eq!(rows[0]["status"], "held");
    assert_eq!(rows[1]["name"], "Activity 2");
    assert_eq!(rows[1]["empty"], true);
    assert_eq!(snapshot["state"]["state"], "paused");
    assert_eq!(snapshot["pause_control"], "resume");
}

#[test]
fn test_replay_reads_stdin_and_config_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("ti.toml");
    std::fs::write(&config, "initial_rows = 1\n").unwrap();

    let mut cmd = ti(temp.path());
    cmd.arg("--config").arg(&config).arg("replay");
    let output = run_with_stdin(cmd, "add Review\ntoggle 2\nadvance 3000\nlist\n");

    assert_eq!(
        stdout(&output),
        "[ ] 1   0:00:00  Activity 1\n[>] 2   0:00:03  Review\n"
    );
}

#[test]
fn test_replay_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = ti(temp.path())
        .arg("replay")
        .arg(temp.path().join("missing.ti"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}

#[test]
fn test_interactive_session_until_eof() {
    let temp = TempDir::new().unwrap();
    let mut cmd = ti(temp.path());
    cmd.env("TI_INITIAL_ROWS", "1").arg("run");
    let output = run_with_stdin(cmd, "rename 1 Focus\nbogus\n");
    let out = stdout(&output);

    assert!(out.starts_with("type 'help' for commands\n"), "stdout: {out}");
    assert!(out.contains("Focus"), "stdout: {out}");
    assert!(out.contains("! unknown command: bogus"), "stdout: {out}");
    assert!(out.trim_end().ends_with("total 0:00:00"), "stdout: {out}");
}
