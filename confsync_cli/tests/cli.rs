use assert_cmd::Command;
use confsync_core::tenant::{
    SOURCE_API_TOKEN_VAR, SOURCE_ENV_URL_VAR, TARGET_API_TOKEN_VAR, TARGET_ENV_URL_VAR,
};
use confsync_test_utils::{HistoryTreeBuilder, MockBackend};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TENANT_VARS: [&str; 4] = [
    SOURCE_API_TOKEN_VAR,
    SOURCE_ENV_URL_VAR,
    TARGET_API_TOKEN_VAR,
    TARGET_ENV_URL_VAR,
];

/// `confsync` isolated from the user's config, data dir and tenant variables
fn confsync(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("confsync").unwrap();
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join("config"))
        .env("CONFSYNC_PATHS__DATA_DIR", workdir.join("data"))
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE");
    for var in TENANT_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn with_tenants(cmd: &mut Command) -> &mut Command {
    cmd.env(SOURCE_API_TOKEN_VAR, "source_token")
        .env(SOURCE_ENV_URL_VAR, "https://src.example.com")
        .env(TARGET_API_TOKEN_VAR, "target_token")
        .env(TARGET_ENV_URL_VAR, "https://dst.example.com")
}

fn main_log(workdir: &Path) -> PathBuf {
    let logs: Vec<PathBuf> = fs::read_dir(workdir.join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.to_string_lossy().ends_with("-main.log"))
        .collect();
    assert_eq!(logs.len(), 1, "expected exactly one main log: {logs:?}");
    logs.into_iter().next().unwrap()
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    confsync(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_sync_without_environment_logs_error_and_exits_zero() {
    let temp = TempDir::new().unwrap();

    confsync(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Watch logs here:"));

    let log = fs::read_to_string(main_log(temp.path())).unwrap();
    assert!(log.contains("ERROR An error occurred:"));
    assert!(log.contains(SOURCE_API_TOKEN_VAR));
    assert!(!log.contains("has started"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_environment_sends_no_requests() {
    let backend = MockBackend::start().await;
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().to_path_buf();
    let base_url = backend.base_url().to_string();

    tokio::task::spawn_blocking(move || {
        confsync(&workdir)
            .env("CONFSYNC_BACKEND__BASE_URL", base_url)
            .env(SOURCE_API_TOKEN_VAR, "source_token")
            .assert()
            .success();
    })
    .await
    .unwrap();

    assert!(backend.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_default_command_runs_full_sync() {
    let backend = MockBackend::start_successful().await;
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().to_path_buf();
    let base_url = backend.base_url().to_string();

    tokio::task::spawn_blocking(move || {
        with_tenants(&mut confsync(&workdir))
            .env("CONFSYNC_BACKEND__BASE_URL", base_url)
            .assert()
            .success()
            .stdout(predicate::str::contains("Watch logs here:"))
            .stdout(predicate::str::contains("-main.log"));
    })
    .await
    .unwrap();

    assert_eq!(backend.requests().len(), 8);

    let log = fs::read_to_string(main_log(temp.path())).unwrap();
    let milestones = [
        "has started.",
        "Extracting entities and config for src cluster...",
        "Extracted entities and config for src cluster.",
        "Extracting entities and config for dst cluster...",
        "Extracted entities and config for dst cluster.",
        "Planning...",
        "Add 1 resources:  test_module >>> test_resource_4",
        "Update 1 resources:  test_module >>> test_resource_2",
        "Delete 1 resources:  test_module >>> test_resource_3",
        "Planned.",
        "Applying...",
        "ALL PLANNED CONFIG APPLIED",
        "Sync procedure is terminated.",
    ];
    let mut position = 0;
    for milestone in milestones {
        let found = log[position..]
            .find(milestone)
            .unwrap_or_else(|| panic!("'{milestone}' missing or out of order in:\n{log}"));
        position += found + milestone.len();
    }

    assert!(log.contains("DEBUG Loaded configuration"));
    assert!(log.contains("INFO Sync procedure ["));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_phase_is_logged_and_exits_zero() {
    let backend = MockBackend::start_successful().await;
    backend.respond("POST", "/migrate_settings_2_0", 500, "planner down");
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().to_path_buf();
    let base_url = backend.base_url().to_string();

    tokio::task::spawn_blocking(move || {
        with_tenants(&mut confsync(&workdir))
            .arg("sync")
            .env("CONFSYNC_BACKEND__BASE_URL", base_url)
            .assert()
            .success();
    })
    .await
    .unwrap();

    let log = fs::read_to_string(main_log(temp.path())).unwrap();
    assert!(log.contains("ERROR 500 in phase migrate_settings_2_0 - see response"));
    assert!(log.contains("ERROR An error occurred: 500 in phase migrate_settings_2_0"));
    assert!(!log.contains("Applying..."));

    let trace = log
        .find("Stack backtrace:\n")
        .map(|start| &log[start..])
        .unwrap_or_else(|| panic!("no backtrace in:\n{log}"));
    assert!(trace.contains("0: "), "empty backtrace in:\n{log}");
}

#[test]
fn test_history_count() {
    let tree = HistoryTreeBuilder::new()
        .with_complete_run("2024-03-13_10-30-15", &["apply.log", "plan.log"])
        .build();
    let temp = TempDir::new().unwrap();

    confsync(temp.path())
        .args(["history", "count"])
        .arg(tree.path().join("complete"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-13_10-30-15 2"));
}

#[test]
fn test_history_count_rejects_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.log");
    fs::write(&file, "x").unwrap();

    confsync(temp.path())
        .args(["history", "count"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_history_list_json_for_env_pair() {
    let temp = TempDir::new().unwrap();
    let root = temp
        .path()
        .join("data/terraform/src_2Eexample_2Ecom__dst_2Eexample_2Ecom/history");
    fs::create_dir_all(root.join("targeted/2024-03-13_10-30-15")).unwrap();
    fs::write(
        root.join("targeted/2024-03-13_10-30-15/foo-import.log"),
        "x",
    )
    .unwrap();

    let output = with_tenants(&mut confsync(temp.path()))
        .args(["history", "list", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([{"name": "2024-03-13_10-30-15", "type": "Post-Process", "nb_logs": 1}])
    );
}

#[test]
fn test_history_index_defaults_to_empty_object() {
    let temp = TempDir::new().unwrap();

    with_tenants(&mut confsync(temp.path()))
        .args(["history", "index"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{}\n"));
}

#[test]
fn test_history_list_requires_environment() {
    let temp = TempDir::new().unwrap();

    confsync(temp.path())
        .args(["history", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(SOURCE_API_TOKEN_VAR));
}

#[test]
fn test_config_path_honors_xdg_config_home() {
    let temp = TempDir::new().unwrap();

    confsync(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("confsync"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_get_reads_environment_override() {
    let temp = TempDir::new().unwrap();

    confsync(temp.path())
        .env("CONFSYNC_BACKEND__BASE_URL", "http://backend.internal:3004")
        .args(["config", "get", "backend.base_url"])
        .assert()
        .success()
        .stdout(predicate::str::diff("http://backend.internal:3004\n"));
}
