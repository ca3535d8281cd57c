//! Integration tests for `stacksift catalog check` and argument handling.

mod common;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use common::{stacksift_cmd, write_catalog};

#[test]
fn test_help_lists_commands() {
    stacksift_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("languages"))
        .stdout(predicate::str::contains("catalog"));
}

#[test]
fn test_catalog_check_reports_conflicts() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "check", "--catalog", catalog.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tools: 4"))
        .stdout(predicate::str::contains("1 alias conflict(s)"))
        .stdout(predicate::str::contains("react"));
}

#[test]
fn test_catalog_check_json() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    let output = stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "check", "--json"])
        .env("STACKSIFT_CATALOG", &catalog)
        .output()
        .expect("run stacksift");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(doc["tools"], 4);
    // react, react-dom, express, preact; the language tool contributes nothing.
    assert_eq!(doc["aliases"], 4);
    assert_eq!(doc["conflicts"][0]["alias"], "react");
    assert_eq!(doc["conflicts"][0]["kept"], "t1");
    assert_eq!(doc["conflicts"][0]["ignored"], "t4");
}

#[test]
fn test_catalog_check_missing_file() {
    let temp = TempDir::new().expect("create temp dir");

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "check", "--catalog"])
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tool catalog unavailable"));
}

#[test]
fn test_catalog_not_configured() {
    let temp = TempDir::new().expect("create temp dir");

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tool catalog configured"));
}

#[test]
fn test_catalog_path_from_config() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());
    let config = temp.path().join("config.yaml");
    fs::write(&config, format!("catalog:\n  path: {}\n", catalog.display())).unwrap();

    stacksift_cmd()
        .args(["--config", config.to_str().unwrap()])
        .args(["catalog", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package aliases: 4"));
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, "detection:\n  batchSize: 0\n").unwrap();

    stacksift_cmd()
        .args(["--config", config.to_str().unwrap()])
        .args(["catalog", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_detect_rejects_bad_repo_ref() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["detect", "not-a-repo", "--token", "x", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository `not-a-repo`"));
}

#[test]
fn test_detect_requires_token() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["detect", "acme/web", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No hosting API token provided"))
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_sync_requires_repositories() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["sync", "--token", "x", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repositories given"));
}

#[test]
fn test_catalog_show_by_slug() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "show", "REACT", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Id: t1"))
        .stdout(predicate::str::contains("Package aliases: react, react-dom"));
}

#[test]
fn test_catalog_show_by_name_json() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    let output = stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "show", "Preact", "--json"])
        .env("STACKSIFT_CATALOG", &catalog)
        .output()
        .expect("run stacksift");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(doc["id"], "t4");
    assert_eq!(doc["name"], "Preact");
    assert_eq!(doc["packageAliases"], serde_json::json!(["preact"]));
}

#[test]
fn test_catalog_show_unknown_tool() {
    let temp = TempDir::new().expect("create temp dir");
    let catalog = write_catalog(temp.path());

    stacksift_cmd()
        .args(["--config", temp.path().join("none.yaml").to_str().unwrap()])
        .args(["catalog", "show", "svelte", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tool with slug or name `svelte`"));
}
