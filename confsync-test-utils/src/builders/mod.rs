//! Test data builders for backend responses and history trees

mod history_tree;
mod plan;

pub use history_tree::HistoryTreeBuilder;
pub use plan::{PlanBuilder, apply_result};
