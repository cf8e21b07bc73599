//! End-to-end tests for the parts of `nissue` that never reach the network.

mod common;

use common::cli::{IssueWorkspace, stdout_json};
use predicates::prelude::*;
use std::fs;

const DATABASE_ID: &str = "0123456789abcdef0123456789abcdef";

#[test]
fn e2e_version_prints_package_version() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(["version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "nissue {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn e2e_version_json() {
    let workspace = IssueWorkspace::new();
    let output = workspace
        .command(["version", "--json"])
        .output()
        .expect("run nissue");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["notion_api_version"], "2022-06-28");
}

#[test]
fn e2e_no_subcommand_prints_hint() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(std::iter::empty::<&str>())
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --help"));
}

#[test]
fn e2e_maintenance_removes_cache_file() {
    let workspace = IssueWorkspace::new();
    fs::write(&workspace.cache_path, b"stale").expect("seed cache");

    workspace
        .command(["maintenance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed cache at:"));
    assert!(!workspace.cache_path.exists());

    workspace
        .command(["maintenance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cache at:"));
}

#[test]
fn e2e_maintenance_json_reports_removal() {
    let workspace = IssueWorkspace::new();
    let output = workspace
        .command(["maintenance", "--json"])
        .output()
        .expect("run nissue");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["removed"], false);
    assert_eq!(
        json["path"],
        workspace.cache_path.display().to_string().as_str()
    );
}

#[test]
fn e2e_list_without_token_fails() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(["--db-id", DATABASE_ID, "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing Notion integration token"))
        .stderr(predicate::str::contains("Hint:"));
}

#[test]
fn e2e_list_without_database_fails() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(["db-issue", "login"])
        .env("NOTION_INTEGRATION_TOKEN", "secret")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing database ID"));
}

#[test]
fn e2e_invalid_database_id_is_rejected() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(["--db-id", "not-a-database", "list"])
        .env("NOTION_INTEGRATION_TOKEN", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid database ID"));
}

#[test]
fn e2e_show_rejects_malformed_id_before_any_request() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(["db-issue-detail", "not an id"])
        .env("NOTION_INTEGRATION_TOKEN", "secret")
        .env("NOTION_DATABASE_ID", DATABASE_ID)
        .env("NOTION_API_BASE_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid issue ID 'not an id'"));
}

#[test]
fn e2e_config_file_supplies_database() {
    let workspace = IssueWorkspace::new();
    workspace.write_config("database_id: 01234567-89ab-cdef-0123-456789abcdef\n");

    let output = workspace
        .command(["doctor", "--json"])
        .env("NOTION_INTEGRATION_TOKEN", "secret")
        .output()
        .expect("run nissue");
    assert!(output.status.success(), "doctor failed: {output:?}");

    let json = stdout_json(&output);
    let checks = json["checks"].as_array().expect("checks");
    let database = checks
        .iter()
        .find(|check| check["name"] == "config.database_id")
        .expect("database check");
    assert_eq!(database["status"], "ok");
    assert_eq!(database["message"], DATABASE_ID);
}

#[test]
fn e2e_doctor_reports_missing_token() {
    let workspace = IssueWorkspace::new();
    let output = workspace
        .command(["doctor", "--json"])
        .output()
        .expect("run nissue");
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["ok"], false);
    let token = json["checks"]
        .as_array()
        .expect("checks")
        .iter()
        .find(|check| check["name"] == "config.token")
        .cloned()
        .expect("token check");
    assert_eq!(token["status"], "error");
}

#[test]
fn e2e_doctor_text_with_full_config() {
    let workspace = IssueWorkspace::new();
    workspace
        .command(["doctor"])
        .env("NOTION_INTEGRATION_TOKEN", "secret")
        .env("NOTION_DATABASE_ID", DATABASE_ID)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK config.token"))
        .stdout(predicate::str::contains("OK cache: No cache file yet"));
}

#[test]
fn e2e_malformed_config_file_is_reported() {
    let workspace = IssueWorkspace::new();
    workspace.write_config("database_id: [unterminated\n");
    workspace
        .command(["maintenance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML error"));
}
