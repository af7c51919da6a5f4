//! Tests that run the `toolbridge` binary itself.

use std::process::Command;

use tempfile::TempDir;

fn toolbridge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_toolbridge"));
    cmd.env_remove("RUST_LOG")
        .env_remove("TOOLBRIDGE_CONFIG")
        .env_remove("TOOLBRIDGE_RECIPIENT")
        .env_remove("YOUR_PHONE");
    cmd
}

#[test]
fn run_logs_unreadable_config_before_exiting() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[bridge\nurl = ").unwrap();

    let output = toolbridge().arg("run").arg("--config").arg(&config).output().unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to load config"), "stdout: {stdout}");
    assert!(stdout.contains("ERROR"), "stdout: {stdout}");
}

#[test]
fn run_logs_missing_recipient_before_exiting() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[logging]\nfile = \"\"\n").unwrap();

    let output = toolbridge().arg("run").arg("--config").arg(&config).output().unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No recipient configured"), "stdout: {stdout}");
}
