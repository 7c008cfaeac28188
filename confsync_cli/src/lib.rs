//! confsync CLI library
//!
//! Command implementations behind the `confsync` binary, exposed as a library
//! so integration tests can drive the orchestrators directly.

pub mod config;
pub mod history;
pub mod logging;
pub mod orchestrators;
pub mod paths;
