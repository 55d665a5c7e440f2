//! Integration tests for the gitwalk CLI

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

use common::{Fixture, OWNER, REPOSITORY};

/// Test helper to get the CLI binary
fn gitwalk_cmd() -> Command {
    Command::cargo_bin("gitwalk").unwrap()
}

fn target() -> String {
    format!("{OWNER}/{REPOSITORY}")
}

#[test]
fn test_cli_help() {
    gitwalk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root"))
        .stdout(predicate::str::contains("--skip-oversized"));
}

#[test]
fn test_cli_version() {
    gitwalk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_malformed_target_fails() {
    gitwalk_cmd()
        .arg("not-a-target")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OWNER/REPO"));
}

#[test]
fn test_zero_max_file_size_fails() {
    let workspaces = tempfile::tempdir().unwrap();

    gitwalk_cmd()
        .args(["acme/charts", "--host", "https://unreachable.invalid"])
        .args(["--max-file-size", "0"])
        .arg("--workspace-dir")
        .arg(workspaces.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_file_size_bytes"));

    assert_eq!(fs::read_dir(workspaces.path()).unwrap().count(), 0);
}

#[test]
fn test_walk_prints_json_lines() {
    let fixture = Fixture::manifests();

    let output = gitwalk_cmd()
        .arg(target())
        .arg("--host")
        .arg(fixture.host())
        .arg("--workspace-dir")
        .arg(fixture.workspace_parent())
        .args(["--root", "/manifests/**"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let records: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let paths: Vec<_> = records
        .iter()
        .map(|record| record["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "manifests",
            "manifests/a.yaml",
            "manifests/sub",
            "manifests/sub/b.yaml"
        ]
    );
    assert_eq!(records[1]["kind"], "file");
    assert_eq!(records[1]["content"], "kind: A\n");
    assert_eq!(records[2]["kind"], "directory");
    assert_eq!(fixture.leftover_workspaces(), 0);
}

#[test]
fn test_skip_read_omits_content() {
    let fixture = Fixture::manifests();

    gitwalk_cmd()
        .arg(target())
        .arg("--host")
        .arg(fixture.host())
        .arg("--workspace-dir")
        .arg(fixture.workspace_parent())
        .args(["--root", "/manifests/a.yaml", "--skip-read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\":\"manifests/a.yaml\""))
        .stdout(predicate::str::contains("content").not())
        .stderr(predicate::str::contains("single-file"));
}

#[test]
fn test_settings_file_supplies_target() {
    let fixture = Fixture::manifests();
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("walk.yaml");
    fs::write(
        &settings_path,
        format!(
            "host: {}\nowner: {OWNER}\nrepository: {REPOSITORY}\nroot: /manifests\n",
            fixture.host().display()
        ),
    )
    .unwrap();

    gitwalk_cmd()
        .arg("--config")
        .arg(&settings_path)
        .arg("--workspace-dir")
        .arg(fixture.workspace_parent())
        .assert()
        .success()
        .stdout(predicate::str::contains("manifests/a.yaml"))
        .stdout(predicate::str::contains("manifests/sub/b.yaml").not());
}

#[test]
fn test_missing_root_fails() {
    let fixture = Fixture::manifests();

    gitwalk_cmd()
        .arg(target())
        .arg("--host")
        .arg(fixture.host())
        .arg("--workspace-dir")
        .arg(fixture.workspace_parent())
        .args(["--root", "/nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nowhere"));

    assert_eq!(fixture.leftover_workspaces(), 0);
}
