//! Process-level CLI regressions that need no serial hardware.

use std::path::PathBuf;
use std::process::{Command, Output};

fn seriallink(args: &[&str], cwd: &PathBuf) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seriallink"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("binary should run")
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "seriallink-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn version_prints_and_succeeds() {
    let dir = unique_temp_dir("version");
    let out = seriallink(&["version"], &dir);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("seriallink "));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_command_is_a_usage_error() {
    let dir = unique_temp_dir("badcmd");
    let out = seriallink(&["send", "zzz", "--string", "hi"], &dir);
    assert_eq!(out.status.code(), Some(64));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("invalid command"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_port_is_a_usage_error() {
    // No config.toml in the temp dir and no --port flag.
    let dir = unique_temp_dir("noport");
    let out = seriallink(&["send", "ping", "--string", "hi"], &dir);
    assert_eq!(out.status.code(), Some(64));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("no serial port"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn config_bounds_are_enforced() {
    let dir = unique_temp_dir("badconfig");
    std::fs::write(
        dir.join("config.toml"),
        "[serial]\nport = \"/dev/null\"\n\n[hdlc]\nmax_payload = 0\n",
    )
    .expect("config should be writable");

    let out = seriallink(&["send", "ping", "--string", "hi"], &dir);
    assert_eq!(out.status.code(), Some(64));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("max_payload"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn open_failure_on_missing_device_is_transport_error() {
    let dir = unique_temp_dir("nodevice");
    let out = seriallink(
        &[
            "send",
            "ping",
            "--string",
            "hi",
            "--port",
            "/dev/does-not-exist-seriallink",
        ],
        &dir,
    );
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("open failed"));
    let _ = std::fs::remove_dir_all(&dir);
}
