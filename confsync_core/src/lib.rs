//! Configuration sync core library
//!
//! Everything the sync CLI needs below the orchestration layer: the tenant
//! model, the backend HTTP client and its wire schemas, plan summaries, the
//! on-disk run history and a small platform helper.

pub mod backend;
pub mod error;
pub mod history;
pub mod plan;
pub mod platform;
pub mod run;
pub mod tenant;

// Re-export main types
pub use backend::{BackendClient, BackendResponse, ChangeKind, Endpoint, PlanResult};
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryKind, HistoryStore};
pub use plan::{KindSummary, summary_lines};
pub use run::{RunContext, RunId};
pub use tenant::{ApiToken, TenantDescriptor, TenantKey, TenantPair};
