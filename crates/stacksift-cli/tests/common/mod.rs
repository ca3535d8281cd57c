//! Shared test utilities for stacksift-cli integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Catalog with one alias collision (`react` claimed by t1 and t4).
pub const CATALOG_JSON: &str = r#"[
  {"id": "t1", "slug": "react", "name": "React", "category": "frontend", "packageAliases": ["react", "react-dom"]},
  {"id": "t2", "slug": "express", "name": "Express", "category": "backend", "packageAliases": ["express"]},
  {"id": "t3", "slug": "go", "name": "Go", "category": "language", "packageAliases": ["go"]},
  {"id": "t4", "slug": "preact", "name": "Preact", "category": "frontend", "packageAliases": ["preact", "react"]}
]"#;

/// Get a Command for the stacksift binary with a clean environment.
///
/// Variables that would leak the developer's own setup into a test are
/// removed; tests pass `--config` explicitly.
#[allow(deprecated)]
pub fn stacksift_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stacksift").expect("stacksift binary should exist");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("STACKSIFT_CATALOG")
        .env_remove("STACKSIFT_CONFIG")
        .env_remove("STACKSIFT_VERBOSE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Write the fixture catalog into `dir`.
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("tools.json");
    fs::write(&path, CATALOG_JSON).expect("write catalog");
    path
}

/// Write a config file pointing the client at `api_base_url`.
pub fn write_config(dir: &Path, api_base_url: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(
        &path,
        format!(
            "github:\n  apiBaseUrl: {}\ndetection:\n  interactiveTimeoutMs: 2000\n  fetchTimeoutMs: 2000\n  batchSize: 2\n",
            api_base_url
        ),
    )
    .expect("write config");
    path
}
