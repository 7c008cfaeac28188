//! Backend endpoints used by a sync run

use std::fmt;

/// One backend route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Register / echo the tenant pair
    TenantList,
    /// Extract a tenant's configuration
    ExtractConfigs,
    /// Extract a tenant's entities over a time window
    ExtractEntity,
    /// Compute the migration plan between both tenants
    MigrateSettings,
    /// Apply the whole plan
    TerraformApplyAll,
}

impl Endpoint {
    /// Path segment under the backend base URL, also used in error file names
    pub fn name(&self) -> &'static str {
        match self {
            Self::TenantList => "tenant_list",
            Self::ExtractConfigs => "extract_configs",
            Self::ExtractEntity => "extract_entity_v2",
            Self::MigrateSettings => "migrate_settings_2_0",
            Self::TerraformApplyAll => "terraform_apply_all",
        }
    }

    /// Absolute URL for this endpoint
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.name())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
