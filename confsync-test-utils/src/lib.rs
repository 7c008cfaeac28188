//! Test utilities for the confsync workspace
//!
//! This crate provides a scriptable mock of the sync backend, JSON fixtures
//! for its responses and a builder for on-disk history trees.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{HistoryTreeBuilder, PlanBuilder};
pub use mocks::{MockBackend, RecordedRequest};
