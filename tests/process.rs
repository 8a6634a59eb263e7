use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn frameloop() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_frameloop"));
    cmd.env("RUST_LOG", "warn")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[test]
fn failed_init_exits_with_error() {
    let output = frameloop().arg("--fail-init").output().unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("initialized"));
    assert!(!stdout.contains("first frame"));
}

#[test]
fn stops_when_requested() {
    let output = frameloop().args(&["--frames", "5"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["initialized", "first frame"]);
}

#[test]
fn fixed_interval() {
    let ts = Instant::now();
    let output = frameloop()
        .args(&["--frames", "4", "--interval", "20"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(ts.elapsed() >= Duration::from_millis(60));
}

#[test]
fn stays_alive_until_killed() {
    let mut child = frameloop().spawn().unwrap();

    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    assert_eq!(lines.next().unwrap().unwrap(), "initialized");
    assert_eq!(lines.next().unwrap().unwrap(), "first frame");

    thread::sleep(Duration::from_millis(300));
    assert!(child.try_wait().unwrap().is_none());

    child.kill().unwrap();
    let status = child.wait().unwrap();
    assert!(!status.success());
}

#[test]
fn native_host_requires_keep_alive() {
    let dir = std::env::temp_dir().join(format!("frameloop-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let path = dir.join("params.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(br#"{ "interval": 0, "keep_alive": false }"#)
        .unwrap();

    let output = frameloop()
        .arg("--config")
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    // Initialization still happened, the failure comes from the host.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("initialized"));
    assert!(!stdout.contains("first frame"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn second_bootstrap_exits_with_error() {
    let output = frameloop()
        .args(&["--frames", "2", "--bootstrap-twice"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    // The first launch ran to completion, the second one never reached `init`.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["initialized", "first frame"]);
}

#[test]
fn failed_update_exits_with_error() {
    let output = frameloop().arg("--fail-update").output().unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["initialized", "first frame"]);
}
