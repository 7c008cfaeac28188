//! Compile-time platform and architecture detection

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    Windows,
    MacOS,
    Linux,
    Other,
}

impl TargetPlatform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        return Self::Windows;

        #[cfg(target_os = "macos")]
        return Self::MacOS;

        #[cfg(target_os = "linux")]
        return Self::Linux;

        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        return Self::Other;
    }

    /// Lowercase name as used in helper binary release names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOS => "darwin",
            Self::Linux => "linux",
            Self::Other => std::env::consts::OS,
        }
    }
}

/// CPU architecture in release-name spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Amd64,
    Arm64,
}

impl Architecture {
    /// Architecture this binary was built for; anything not ARM is treated as amd64
    pub fn current() -> Self {
        Self::from_arch(std::env::consts::ARCH)
    }

    pub fn from_arch(arch: &str) -> Self {
        match arch {
            "aarch64" | "arm" => Self::Arm64,
            _ => Self::Amd64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}
