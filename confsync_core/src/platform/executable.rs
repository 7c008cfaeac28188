//! Executable lookup helpers

use std::path::Path;

/// File extension of executables on this platform
pub fn exec_extension() -> &'static str {
    if cfg!(target_os = "windows") {
        ".exe"
    } else {
        ""
    }
}

/// `name` with the platform executable extension appended
pub fn executable_name(name: &str) -> String {
    format!("{name}{}", exec_extension())
}

/// Whether `path` exists, is not a directory and can be executed
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if metadata.is_dir() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
    }
}
