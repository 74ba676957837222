#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use catalog_query::{CatalogRecord, RawRecord, RecordType};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn catalog_dir() -> PathBuf {
    repo_root().join("catalogs")
}

pub fn catalog_path(name: &str) -> PathBuf {
    catalog_dir().join(format!("{name}.json"))
}

/// `catalog-query` pinned to this checkout regardless of the caller's env.
pub fn catalog_query_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog-query"));
    cmd.env("CATALOG_ROOT", repo_root())
        .env_remove("CATALOG_PATH")
        .env_remove("RUST_LOG");
    cmd
}

pub fn catalog_lint_command(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog-lint"));
    cmd.arg(dir).env_remove("RUST_LOG");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Names from NDJSON records printed by `catalog-query --json`.
pub fn ndjson_names(stdout: &[u8]) -> Result<Vec<String>> {
    let text = String::from_utf8(stdout.to_vec())?;
    let mut names = Vec::new();
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let value: Value = serde_json::from_str(line)?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .context("record without name")?;
        names.push(name.to_string());
    }
    Ok(names)
}

pub fn record(value: Value) -> CatalogRecord {
    let raw: RawRecord = serde_json::from_value(value).expect("fixture record should decode");
    raw.into_record(0, &RecordType::Official)
        .expect("fixture record should be complete")
}

/// The two-record collection used throughout the query scenarios.
pub fn button_and_alert() -> Vec<CatalogRecord> {
    vec![
        record(json!({
            "name": "Button", "description": "Clickable elements for user actions",
            "category": "Actions", "owner": "Web Design Systems Team",
            "usage": "High", "lastUpdated": "2024-01-15"
        })),
        record(json!({
            "name": "Alert", "description": "Inline status messages",
            "category": "Feedback", "owner": "Web Design Systems Team",
            "usage": "Growing", "lastUpdated": "2024-01-14"
        })),
    ]
}

pub fn names(records: &[CatalogRecord]) -> Vec<&str> {
    records.iter().map(|record| record.name.as_str()).collect()
}
