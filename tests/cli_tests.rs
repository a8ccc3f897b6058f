//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn open_voice_bin() -> Command {
    let mut cmd = Command::cargo_bin("open-voice").expect("binary should build");
    cmd.env_remove("OPEN_VOICE_SOCKET")
        .env_remove("OPEN_VOICE_LOG")
        .env_remove("OPEN_VOICE_CLIENT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    open_voice_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("--socket"));
}

#[test]
fn version_output() {
    open_voice_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("open-voice"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_command_is_usage_error() {
    open_voice_bin().assert().code(2);
}

#[test]
fn config_help_lists_actions() {
    open_voice_bin()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set-device"))
        .stdout(predicate::str::contains("set-shortcut"));
}

#[test]
fn client_config_path_honors_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.toml");

    open_voice_bin()
        .args(["client-config", "path", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("client.toml"));
}

#[test]
fn client_config_init_creates_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("client.toml");

    open_voice_bin()
        .env("OPEN_VOICE_CLIENT_CONFIG", &path)
        .args(["client-config", "init"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("log_level"));

    open_voice_bin()
        .env("OPEN_VOICE_CLIENT_CONFIG", &path)
        .args(["client-config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn client_config_show_reports_socket_override() {
    let dir = tempfile::tempdir().unwrap();

    open_voice_bin()
        .env("OPEN_VOICE_CLIENT_CONFIG", dir.path().join("client.toml"))
        .args(["client-config", "show", "--socket", "/tmp/elsewhere.sock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/elsewhere.sock"));
}

#[test]
fn client_config_show_rejects_invalid_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.toml");
    std::fs::write(&path, "log_level = \"loud\"\n").unwrap();

    open_voice_bin()
        .env("OPEN_VOICE_CLIENT_CONFIG", &path)
        .args(["client-config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid log_level"));
}

#[test]
fn unreachable_backend_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();

    open_voice_bin()
        .env("OPEN_VOICE_CLIENT_CONFIG", dir.path().join("client.toml"))
        .env("OPEN_VOICE_SOCKET", dir.path().join("missing.sock"))
        .arg("toggle")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot connect to backend"));
}

#[test]
fn invalid_shortcut_fails_before_connecting() {
    let dir = tempfile::tempdir().unwrap();

    open_voice_bin()
        .env("OPEN_VOICE_CLIENT_CONFIG", dir.path().join("client.toml"))
        .env("OPEN_VOICE_SOCKET", dir.path().join("missing.sock"))
        .args(["config", "set-shortcut", "Ctrl+Shift"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid shortcut"));
}
