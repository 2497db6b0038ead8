//! Integration tests for CLI paths that exit before the event loop starts.

use std::process::Command;

fn run_harbor(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_harbor"))
        .args(args)
        .output()
        .expect("Failed to execute harbor")
}

#[test]
fn test_version_prints_package_version() {
    let output = run_harbor(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "unexpected version output: {stdout}"
    );
}

#[test]
fn test_help_lists_flags() {
    let output = run_harbor(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--dev", "--production", "--url", "--resources-dir", "--verbose"] {
        assert!(stdout.contains(flag), "help is missing {flag}: {stdout}");
    }
}

#[test]
fn test_conflicting_modes_are_rejected() {
    let output = run_harbor(&["--dev", "--production"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains(r#""event":"#),
        "usage errors should not be JSON logs: {stderr}"
    );
}

#[test]
fn test_invalid_url_fails_before_window() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_harbor"))
        .args(["--url", "ftp://example.com"])
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute harbor");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ftp://example.com"), "stderr: {stderr}");
}
