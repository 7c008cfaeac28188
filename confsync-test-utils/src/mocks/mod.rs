//! Mock implementations for testing

mod backend;

pub use backend::{MockBackend, RecordedRequest};
