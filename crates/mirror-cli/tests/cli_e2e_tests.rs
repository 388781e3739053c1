//! CLI end-to-end tests that invoke the compiled `release-mirror` binary.
//!
//! The environment is cleared for every run so settings from the host (CI
//! systems commonly export `GITHUB_REPOSITORY`) cannot leak in.

use std::fs;

use assert_cmd::Command;
use mirror_test_utils::{FixtureAsset, ReleaseServer, unix_time};
use predicates::prelude::*;
use tempfile::TempDir;

fn release_mirror() -> Command {
    let mut cmd = Command::cargo_bin("release-mirror").expect("binary should be built");
    cmd.env_clear();
    cmd
}

#[test]
fn help_lists_environment_variables() {
    release_mirror()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GITHUB_ARTEFACTS"))
        .stdout(predicate::str::contains("CHECK_INTERVAL"));
}

#[test]
fn missing_settings_are_fatal_and_named() {
    let dir = TempDir::new().unwrap();

    release_mirror()
        .env("GITHUB_REPOSITORY", "widgets")
        .env("DOWNLOAD_PATH", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_OWNER"))
        .stderr(predicate::str::contains("GITHUB_ARTEFACTS"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn invalid_interval_is_fatal() {
    let dir = TempDir::new().unwrap();

    release_mirror()
        .env("GITHUB_OWNER", "acme")
        .env("GITHUB_REPOSITORY", "widgets")
        .env("GITHUB_ARTEFACTS", "a")
        .env("DOWNLOAD_PATH", dir.path())
        .env("CHECK_INTERVAL", "every so often")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid check interval"));
}

#[test]
fn run_once_mirrors_and_exits() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(ReleaseServer::start());
    server.publish(
        "widget.tar.gz",
        FixtureAsset::new("archive bytes").modified_at(unix_time(1_700_000_000)),
    );
    server.publish("widget.sha256", FixtureAsset::new("abc123"));
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("mirror");

    release_mirror()
        .env("GITHUB_OWNER", "acme")
        .env("GITHUB_REPOSITORY", "widgets")
        .env("GITHUB_ARTEFACTS", "widget.tar.gz, ,widget.sha256,missing.bin")
        .env("DOWNLOAD_PATH", &target)
        .env("CHECK_INTERVAL", "0")
        .env("GITHUB_BASE_URL", server.base_url())
        .assert()
        .success()
        .stderr(predicate::str::contains("Run once mode"))
        .stderr(predicate::str::contains("missing.bin"));

    assert_eq!(
        fs::read(target.join("widget.tar.gz")).unwrap(),
        b"archive bytes"
    );
    assert_eq!(fs::read(target.join("widget.sha256")).unwrap(), b"abc123");
    assert!(!target.join("missing.bin").exists());
    assert_eq!(server.get_count("widget.tar.gz"), 1);
}

#[cfg(unix)]
#[test]
fn scheduled_mode_stops_cleanly_on_sigterm() {
    use std::process::Stdio;
    use std::time::{Duration, Instant};

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(ReleaseServer::start());
    server.publish("tool", FixtureAsset::new("v1"));
    let dir = TempDir::new().unwrap();

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("release-mirror"))
        .env_clear()
        .env("GITHUB_OWNER", "acme")
        .env("GITHUB_REPOSITORY", "widgets")
        .env("GITHUB_ARTEFACTS", "tool")
        .env("DOWNLOAD_PATH", dir.path())
        .env("CHECK_INTERVAL", "1h")
        .env("GITHUB_BASE_URL", server.base_url())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start release-mirror");

    let deadline = Instant::now() + Duration::from_secs(30);
    while !dir.path().join("tool").exists() {
        assert!(Instant::now() < deadline, "first pass never completed");
        std::thread::sleep(Duration::from_millis(20));
    }

    let killed = std::process::Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("failed to run kill");
    assert!(killed.success());

    let deadline = Instant::now() + Duration::from_secs(30);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        assert!(Instant::now() < deadline, "release-mirror ignored SIGTERM");
        std::thread::sleep(Duration::from_millis(20));
    };

    assert!(status.success(), "expected clean exit, got {status:?}");
    assert_eq!(server.get_count("tool"), 1);
}
