//! Layered configuration tests
//!
//! Every test points the manager at its own temporary config file.

use confsync_cli::config::ConfigManager;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Test helper: Create a temporary config manager with isolated directory
fn create_test_config_manager(temp_dir: &TempDir) -> ConfigManager {
    let config_path = temp_dir.path().join("config.toml");
    ConfigManager::with_path(config_path)
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    let config = config_manager.load().unwrap();

    assert_eq!(config.backend.base_url, "http://localhost:3004");
    assert_eq!(config.backend.timeout_seconds, None);
    assert_eq!(config.paths.log_dir, PathBuf::from("logs"));
}

#[test]
fn test_file_values_override_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[backend]\nbase_url = \"http://sync.internal:8080\"\ntimeout_seconds = 600\n\n\
         [paths]\nlog_dir = \"/var/log/confsync\"\n",
    )
    .unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    let config = config_manager.load().unwrap();

    assert_eq!(config.backend.base_url, "http://sync.internal:8080");
    assert_eq!(config.backend.timeout_seconds, Some(600));
    assert_eq!(config.paths.log_dir, PathBuf::from("/var/log/confsync"));
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[paths]\nlog_dir = \"run-logs\"\n",
    )
    .unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    let config = config_manager.load().unwrap();

    assert_eq!(config.paths.log_dir, PathBuf::from("run-logs"));
    assert_eq!(config.backend.base_url, "http://localhost:3004");
}

#[test]
fn test_get_dot_notation() {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    assert_eq!(
        config_manager.get("backend.base_url").unwrap(),
        "http://localhost:3004"
    );
    assert!(config_manager.get("backend.nope").is_err());
    assert!(config_manager.get("backend").is_err());
}

#[test]
fn test_list_is_sorted_and_flattened() {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    let keys: Vec<String> = config_manager
        .list()
        .unwrap()
        .into_iter()
        .map(|(key, _)| key)
        .collect();

    assert_eq!(keys, ["backend.base_url", "paths.data_dir", "paths.log_dir"]);
}

#[test]
fn test_invalid_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[backend]\ntimeout_seconds = \"soon\"\n",
    )
    .unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    assert!(config_manager.load().is_err());
}
