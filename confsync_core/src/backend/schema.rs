//! Request and response schemas of the sync backend
//!
//! Query strings are serialized from these structs in field order, so the
//! declaration order here is the order on the wire.

use crate::run::RunId;
use crate::tenant::TenantKey;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Query of `POST /extract_configs`
#[derive(Debug, Clone, Serialize)]
pub struct ExtractConfigsQuery {
    pub tenant_key: TenantKey,
}

/// Query of `POST /extract_entity_v2`
#[derive(Debug, Clone, Serialize)]
pub struct ExtractEntityQuery {
    pub tenant_key: TenantKey,
    pub time_from_minutes: u32,
    pub time_to_minutes: u32,
}

impl ExtractEntityQuery {
    /// Query over the fixed lookback window ending now
    pub fn lookback(tenant_key: TenantKey) -> Self {
        Self {
            tenant_key,
            time_from_minutes: super::ENTITY_LOOKBACK_MINUTES,
            time_to_minutes: super::ENTITY_WINDOW_END_MINUTES,
        }
    }
}

/// Query of `POST /migrate_settings_2_0`
#[derive(Debug, Clone, Serialize)]
pub struct MigrateSettingsQuery {
    pub tenant_key_main: TenantKey,
    pub tenant_key_target: TenantKey,
    pub action_id: RunId,
    pub enable_dashboards: bool,
    pub enable_omit_destroy: bool,
    pub enable_ultra_parallel: bool,
    pub terraform_parallelism: u32,
}

impl MigrateSettingsQuery {
    /// Full plan with dashboards, destroys kept, ultra-parallel on
    pub fn plan_all(main: TenantKey, target: TenantKey, action_id: RunId) -> Self {
        Self {
            tenant_key_main: main,
            tenant_key_target: target,
            action_id,
            enable_dashboards: true,
            enable_omit_destroy: false,
            enable_ultra_parallel: true,
            terraform_parallelism: super::TERRAFORM_PARALLELISM,
        }
    }
}

/// Query of `POST /terraform_apply_all`
#[derive(Debug, Clone, Serialize)]
pub struct ApplyAllQuery {
    pub tenant_key_main: TenantKey,
    pub tenant_key_target: TenantKey,
    pub action_id: RunId,
}

/// One module selector in the apply body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyTarget {
    pub module: String,
    pub module_trimmed: String,
    pub unique_name: String,
}

impl ApplyTarget {
    /// Placeholder selecting every planned module
    pub fn all() -> Self {
        Self {
            module: "All".to_string(),
            module_trimmed: "All".to_string(),
            unique_name: "All".to_string(),
        }
    }
}

/// Kind of change a plan proposes for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "A")]
    Add,
    #[serde(rename = "U")]
    Update,
    #[serde(rename = "D")]
    Delete,
    /// Any status the backend may add later; never reported
    #[serde(other)]
    Unknown,
}

impl ChangeKind {
    /// Kinds reported after planning, in reporting order
    pub const REPORTED: [ChangeKind; 3] = [Self::Add, Self::Update, Self::Delete];

    /// Parse the one-letter code used by the backend
    pub fn from_code(code: &str) -> Self {
        match code {
            "A" => Self::Add,
            "U" => Self::Update,
            "D" => Self::Delete,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Response of `POST /migrate_settings_2_0`
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResult {
    pub modules: Vec<PlanModule>,
}

/// Planned changes of one configuration module
#[derive(Debug, Clone, Deserialize)]
pub struct PlanModule {
    pub module: String,
    /// Change kinds occurring in this module
    #[serde(default, deserialize_with = "deserialize_stats")]
    pub stats: Vec<ChangeKind>,
    #[serde(default)]
    pub data: Vec<PlannedResource>,
}

impl PlanModule {
    pub fn has_kind(&self, kind: ChangeKind) -> bool {
        self.stats.contains(&kind)
    }
}

/// One resource in a module plan
#[derive(Debug, Clone, Deserialize)]
pub struct PlannedResource {
    pub key_id: String,
    pub status: ChangeKind,
}

/// `stats` arrives either as `["A", "D"]` or keyed like `{"A": 3, "D": 1}`
#[derive(Deserialize)]
#[serde(untagged)]
enum StatsRepr {
    List(Vec<String>),
    Keyed(BTreeMap<String, serde_json::Value>),
}

fn deserialize_stats<'de, D>(deserializer: D) -> Result<Vec<ChangeKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let codes: Vec<String> = match StatsRepr::deserialize(deserializer)? {
        StatsRepr::List(codes) => codes,
        StatsRepr::Keyed(map) => map.into_keys().collect(),
    };
    Ok(codes.iter().map(|c| ChangeKind::from_code(c)).collect())
}

/// Response of `POST /terraform_apply_all`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyResult {
    #[serde(default)]
    pub log_dict: Option<ApplyLog>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyLog {
    #[serde(default)]
    pub apply_complete: Option<bool>,
}

impl ApplyResult {
    /// Only an explicit `apply_complete: true` counts as success
    pub fn is_complete(&self) -> bool {
        self.log_dict
            .as_ref()
            .and_then(|log| log.apply_complete)
            .unwrap_or(false)
    }
}
