use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("dstna").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dstna"));
}

#[test]
fn run_help_lists_window_flags() {
    let mut cmd = Command::cargo_bin("dstna").unwrap();
    cmd.args(["run", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--start"))
        .stdout(predicate::str::contains("--growth-join"));
}

#[test]
fn bad_growth_join_is_rejected() {
    let mut cmd = Command::cargo_bin("dstna").unwrap();
    cmd.args(["run", "--growth-join", "outer", "--no-charts"]);
    cmd.assert().failure();
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn run_online_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("dstna").unwrap();
    cmd.args(["run", "--out-dir"])
        .arg(dir.path())
        .args(["--format", "svg"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Gross Domestic Product"));
}
