// Shared helpers for gridplan integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fixtures")
        .join(name)
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fixtures")
}

/// The gridplan binary, run from `workdir` with a clean environment so no
/// stray configuration or color settings leak into the test.
pub fn gridplan(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gridplan"));
    cmd.current_dir(workdir.path())
        .env_remove("GRIDPLAN_CONFIG")
        .env_remove("GRIDPLAN_LOG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", workdir.path())
        .env("HOME", workdir.path())
        .env("NO_COLOR", "1");
    cmd
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}
