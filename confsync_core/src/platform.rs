//! Platform Abstraction Layer
//!
//! OS and CPU detection plus the executable checks needed to locate helper
//! binaries (terraform, monaco) next to the backend.

pub mod build_config;
pub mod executable;

pub use build_config::{Architecture, TargetPlatform};
pub use executable::{exec_extension, executable_name, is_executable};

/// True on Windows builds
pub fn is_windows() -> bool {
    TargetPlatform::current() == TargetPlatform::Windows
}

/// True on macOS builds
pub fn is_darwin() -> bool {
    TargetPlatform::current() == TargetPlatform::MacOS
}

/// `<os>/<arch>` string as logged at the start of a run, e.g. `linux/amd64`
pub fn describe() -> String {
    format!(
        "{}/{}",
        TargetPlatform::current().as_str(),
        Architecture::current().as_str()
    )
}
