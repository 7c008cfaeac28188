//! Centralized path management for the confsync CLI
//!
//! Default locations of the data directory (terraform state and run history),
//! the configuration file and the per-run log directory.

use std::path::PathBuf;

/// The name of the application directory used across all platforms
const APP_DATA_DIR: &str = "confsync";

/// The name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Log directory used when none is configured, relative to the working directory
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Returns the base data directory for the application
///
/// On Unix-like systems this follows the XDG Base Directory specification:
/// - `~/.local/share/confsync`
///
/// On Windows, this uses the user's application data directory:
/// - `%APPDATA%/confsync`
///
/// If the standard directories cannot be determined, falls back to `.confsync`
/// in the current directory.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".confsync"))
}

/// Returns the configuration directory
///
/// `$XDG_CONFIG_HOME/confsync` when the variable is set (Unix only), otherwise
/// the platform config directory.
pub fn get_config_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg_config).join(APP_DATA_DIR);
    }

    dirs::config_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".confsync"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}
