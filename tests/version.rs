//! Integration test: Verify binary prints correct version

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_ctail"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected output to contain version '{}', but got: {}",
        env!("CARGO_PKG_VERSION"),
        stdout
    );
}

#[test]
fn missing_container_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_ctail"))
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2), "clap usage errors exit with 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("<CONTAINER>"), "got: {stderr}");
}

#[test]
fn invalid_server_fails_before_touching_the_terminal() {
    let output = Command::new(env!("CARGO_BIN_EXE_ctail"))
        .args(["web-1", "--server", "ftp://nope"])
        .env_remove("CTAIL_SERVER")
        .env("CTAIL_CONFIG", "/nonexistent/ctail/config.toml")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
