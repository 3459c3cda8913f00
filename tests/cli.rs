// tests/cli.rs

//! End-to-end tests for the `sedot` binary.
//!
//! Nothing here reaches the network: URLs are either rejected before any
//! request or the commands under test are offline.

mod common;

use assert_cmd::Command;
use common::{sedot_formula_rb, RELEASE_DIGEST};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Build a `Command` targeting the cargo-built `sedot` binary with an
/// empty config.
fn sedot(config_dir: &TempDir) -> Command {
    let config = config_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("sedot").unwrap();
    cmd.env("SEDOT_CONFIG", &config).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_smoke() {
    let tmp = TempDir::new().unwrap();
    sedot(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version() {
    let tmp = TempDir::new().unwrap();
    sedot(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("sedot v{}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unsupported_url_fails_run() {
    let tmp = TempDir::new().unwrap();
    sedot(&tmp)
        .args(["--dry-run", "https://example.org/video/1"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Processing https://example.org/video/1"))
        .stdout(predicate::str::contains("sedot does not support the domain"))
        .stdout(predicate::str::contains("1 download(s) failed."));
}

#[test]
fn test_empty_url_is_reported() {
    let tmp = TempDir::new().unwrap();
    sedot(&tmp)
        .args(["--dry-run", "   "])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: Empty URL provided."));
}

#[test]
fn test_invalid_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[http]\npage_timeout_secs = 0\n").unwrap();
    sedot(&tmp)
        .args(["--dry-run", "https://www.instagram.com/p/x/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_formula_lint() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("sedot.rb");
    let bad = tmp.path().join("sedot-bad.rb");
    fs::write(&good, sedot_formula_rb(RELEASE_DIGEST)).unwrap();
    fs::write(&bad, sedot_formula_rb("calculate_this_from_tarball")).unwrap();

    sedot(&tmp)
        .args(["formula", "lint"])
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] sedot 0.1.1"));

    sedot(&tmp)
        .args(["formula", "lint"])
        .arg(&good)
        .arg(&bad)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAILED] Invalid digest 'calculate_this_from_tarball'"))
        .stdout(predicate::str::contains("1 of 2 formula(s) failed"));
}

#[test]
fn test_formula_render_bump_as_toml() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("sedot.rb");
    fs::write(&file, sedot_formula_rb(RELEASE_DIGEST)).unwrap();
    let digest = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    sedot(&tmp)
        .args(["formula", "render"])
        .arg(&file)
        .args(["--version", "0.2.0", "--sha256", digest, "--toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refs/tags/v0.2.0.tar.gz"))
        .stdout(predicate::str::contains(format!("sha256 = \"{}\"", digest)));
}

#[test]
fn test_formula_digest_of_local_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("hello.txt");
    fs::write(&file, "hello world").unwrap();

    sedot(&tmp)
        .args(["formula", "digest"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        ));
}

#[test]
fn test_completions() {
    let tmp = TempDir::new().unwrap();
    sedot(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sedot"));
}
