//! Sync backend HTTP surface
//!
//! The backend owns extraction, planning and the terraform-like apply engine.
//! This module only knows its endpoints and the shape of what goes over the
//! wire; sequencing lives in the CLI orchestrator.

pub mod client;
pub mod endpoint;
pub mod schema;

pub use client::{BackendClient, BackendResponse, DEFAULT_BACKEND_URL};
pub use endpoint::Endpoint;
pub use schema::{
    ApplyAllQuery, ApplyLog, ApplyResult, ApplyTarget, ChangeKind, ExtractConfigsQuery,
    ExtractEntityQuery, MigrateSettingsQuery, PlanModule, PlanResult, PlannedResource,
};

/// Entity extraction lookback (15 days)
pub const ENTITY_LOOKBACK_MINUTES: u32 = 21_600;

/// Upper bound of the entity extraction window, relative to now
pub const ENTITY_WINDOW_END_MINUTES: u32 = 0;

/// Terraform parallelism requested for planning
pub const TERRAFORM_PARALLELISM: u32 = 10;
