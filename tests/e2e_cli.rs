//! CLI end-to-end tests
//!
//! Tests for the snapgrid command-line interface.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the snapgrid binary with a clean environment.
#[allow(deprecated)]
fn snapgrid_cmd() -> Command {
    let mut cmd = Command::cargo_bin("snapgrid").unwrap();
    for var in [
        "SNAPGRID_HOST",
        "SNAPGRID_PORT",
        "PORT",
        "CLOUDINARY_CLOUD_NAME",
        "CLOUDINARY_API_KEY",
        "CLOUDINARY_API_SECRET",
        "REDIS_URL",
        "SNAPGRID_CACHE_BACKEND",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    snapgrid_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    snapgrid_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("snapgrid"))
        .stdout(predicate::str::contains("clear-cache"));
}

#[test]
fn test_cli_version_command() {
    snapgrid_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_start_help() {
    snapgrid_cmd()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start the server"));
}

#[test]
fn test_cli_validate_good_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "upstream": {"cloud_name": "demo", "api_key": "k", "api_secret": "s"},
            "cache": {"backend": "memory"}
        }"#,
    )
    .unwrap();

    snapgrid_cmd()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("warning").not());
}

#[test]
fn test_cli_validate_reports_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"upstream": {"max_results": 100}}"#).unwrap();

    snapgrid_cmd()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_results"))
        .stdout(predicate::str::contains("cloud_name"));
}

#[test]
fn test_cli_validate_rejects_bad_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    snapgrid_cmd()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_cli_validate_uses_global_config_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"server": {"port": 0}}"#).unwrap();

    snapgrid_cmd()
        .args(["--config", path.to_str().unwrap(), "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server.port is 0"));
}

#[test]
fn test_cli_clear_cache_without_cache_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"cache": {"backend": "none"}}"#).unwrap();

    snapgrid_cmd()
        .args(["--config", path.to_str().unwrap(), "clear-cache"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cache not available"));
}

#[test]
fn test_cli_clear_cache_with_memory_backend() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"cache": {"backend": "memory"}}"#).unwrap();

    snapgrid_cmd()
        .args(["--config", path.to_str().unwrap(), "clear-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));
}

#[tokio::test]
async fn test_cli_fetch_json() {
    let media_host = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::path(common::RESOURCES_PATH))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(common::resources(2)))
        .mount(&media_host)
        .await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = common::config_for(&media_host);
    let json = serde_json::json!({
        "upstream": {
            "api_base_url": config.upstream.api_base_url,
            "delivery_base_url": config.upstream.delivery_base_url,
            "cloud_name": config.upstream.cloud_name,
            "api_key": config.upstream.api_key,
            "api_secret": "secret"
        }
    });
    fs::write(&path, json.to_string()).unwrap();

    let output = tokio::task::spawn_blocking(move || {
        snapgrid_cmd()
            .args(["--config", path.to_str().unwrap(), "fetch", "--json"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let images: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(images.as_array().unwrap().len(), 2);
    assert_eq!(images[0]["id"], "gallery/photo_0");
}

#[test]
fn test_cli_fetch_unreachable_host_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"upstream": {"api_base_url": "http://127.0.0.1:1", "cloud_name": "demo", "timeout_secs": 2}}"#,
    )
    .unwrap();

    snapgrid_cmd()
        .args(["--config", path.to_str().unwrap(), "fetch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch gallery"));
}
