//! Sync command orchestrator
//!
//! Drives one configuration sync against the backend: register both tenants,
//! extract the source and the destination, plan, then apply everything that
//! was planned. Phases run strictly one after the other; the first failure
//! ends the run. Every phase result is persisted next to the main log under
//! the run id.

use crate::config::AppConfig;
use anyhow::Result;
use confsync_core::backend::{
    ApplyAllQuery, ApplyResult, ApplyTarget, BackendClient, BackendResponse, Endpoint,
    ExtractConfigsQuery, ExtractEntityQuery, MigrateSettingsQuery, PlanResult,
};
use confsync_core::error::ProtocolError;
use confsync_core::{RunContext, RunId, TenantKey, TenantPair, platform, summary_lines};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// Outcome of a successful sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: RunId,
    /// Add, Update and Delete summary lines as logged
    pub plan_summary: Vec<String>,
    /// Phase artifacts written, in phase order
    pub artifacts: Vec<PathBuf>,
}

/// Orchestrator for the sync command
pub struct SyncOrchestrator {
    client: BackendClient,
    run: RunContext,
    tenants: TenantPair,
}

impl SyncOrchestrator {
    /// Create a new sync orchestrator
    pub fn new(config: &AppConfig, run: RunContext, tenants: TenantPair) -> Result<Self> {
        debug!(
            "Creating sync orchestrator for backend {}",
            config.backend.base_url
        );
        let client = BackendClient::new(&config.backend.base_url, config.backend.timeout())?;

        Ok(Self {
            client,
            run,
            tenants,
        })
    }

    /// Create a sync orchestrator for the tenants named in the environment
    pub fn from_env(config: &AppConfig, run: RunContext) -> Result<Self> {
        let tenants = TenantPair::from_env()?;
        Self::new(config, run, tenants)
    }

    /// Run all phases
    pub async fn run(&self) -> Result<SyncReport> {
        info!("Sync procedure [{}] has started.", self.run.run_id());
        debug!("Running on {}", platform::describe());

        let mut artifacts = Vec::new();

        self.register_tenants().await?;

        info!("Extracting entities and config for src cluster...");
        artifacts.extend(self.extract_cluster(self.tenants.main_key(), "src").await?);
        info!("Extracted entities and config for src cluster.");

        info!("Extracting entities and config for dst cluster...");
        artifacts.extend(self.extract_cluster(self.tenants.target_key(), "dst").await?);
        info!("Extracted entities and config for dst cluster.");

        info!("Planning...");
        let (plan_artifact, plan_summary) = self.plan().await?;
        artifacts.push(plan_artifact);
        info!("Planned.");

        info!("Applying...");
        artifacts.push(self.apply().await?);
        info!("ALL PLANNED CONFIG APPLIED");
        info!("Sync procedure is terminated.");

        Ok(SyncReport {
            run_id: self.run.run_id().clone(),
            plan_summary,
            artifacts,
        })
    }

    /// Phases 1-2: register the tenant pair and read it back
    async fn register_tenants(&self) -> Result<()> {
        let response = self
            .client
            .post_json(Endpoint::TenantList, &self.tenants.tenant_list())
            .await?;
        self.check_phase(Endpoint::TenantList, response)?;

        let response = self.client.get(Endpoint::TenantList).await?;
        let loaded = self.check_phase(Endpoint::TenantList, response)?;
        debug!("Loaded configuration");
        debug!("{}", loaded.body);

        Ok(())
    }

    /// Config and entity extraction of one tenant; `side` is `src` or `dst`
    async fn extract_cluster(&self, tenant_key: TenantKey, side: &str) -> Result<[PathBuf; 2]> {
        let configs = self
            .execute_phase(
                Endpoint::ExtractConfigs,
                &ExtractConfigsQuery {
                    tenant_key: tenant_key.clone(),
                },
            )
            .await?;
        let configs = response_json(Endpoint::ExtractConfigs, &configs)?;
        let config_artifact = self.run.write_artifact(&format!("config-{side}"), &configs)?;

        let entities = self
            .execute_phase(
                Endpoint::ExtractEntity,
                &ExtractEntityQuery::lookback(tenant_key),
            )
            .await?;
        let entities = response_json(Endpoint::ExtractEntity, &entities)?;
        let entity_artifact = self.run.write_artifact(&format!("entity-{side}"), &entities)?;

        Ok([config_artifact, entity_artifact])
    }

    /// Plan everything and log the per-kind summaries
    async fn plan(&self) -> Result<(PathBuf, Vec<String>)> {
        let query = MigrateSettingsQuery::plan_all(
            self.tenants.main_key(),
            self.tenants.target_key(),
            self.run.run_id().clone(),
        );
        let response = self.execute_phase(Endpoint::MigrateSettings, &query).await?;

        // Persist the raw plan before interpreting it
        let raw = response_json(Endpoint::MigrateSettings, &response)?;
        let artifact = self.run.write_artifact("plan", &raw)?;

        let plan: PlanResult = serde_json::from_value(raw)
            .map_err(|e| ProtocolError::malformed(Endpoint::MigrateSettings.name(), e.to_string()))
            .map_err(confsync_core::Error::from)?;

        let summary = summary_lines(&plan)
            .iter()
            .map(|line| {
                let line = line.to_string();
                info!("{line}");
                line
            })
            .collect();

        Ok((artifact, summary))
    }

    /// Apply all planned modules; only an explicit `apply_complete: true` succeeds
    async fn apply(&self) -> Result<PathBuf> {
        let query = ApplyAllQuery {
            tenant_key_main: self.tenants.main_key(),
            tenant_key_target: self.tenants.target_key(),
            action_id: self.run.run_id().clone(),
        };
        let response = self
            .client
            .post(Endpoint::TerraformApplyAll, &query, &[ApplyTarget::all()])
            .await?;
        let response = self.check_phase(Endpoint::TerraformApplyAll, response)?;

        let raw = response_json(Endpoint::TerraformApplyAll, &response)?;
        let artifact = self.run.write_artifact("apply-all", &raw)?;

        // A body that does not even have the result shape counts as incomplete
        let result: ApplyResult = serde_json::from_value(raw).unwrap_or_default();
        if !result.is_complete() {
            let failure = ProtocolError::apply_incomplete(&artifact);
            error!("{failure}");
            return Err(confsync_core::Error::from(failure).into());
        }

        Ok(artifact)
    }

    /// `POST` an extraction or planning phase with an empty JSON body
    async fn execute_phase<Q: Serialize>(
        &self,
        endpoint: Endpoint,
        query: &Q,
    ) -> Result<BackendResponse> {
        let response = self.client.post(endpoint, query, &json!({})).await?;
        self.check_phase(endpoint, response)
    }

    /// Turn a non-2xx answer into a phase failure, keeping the body on disk
    fn check_phase(&self, endpoint: Endpoint, response: BackendResponse) -> Result<BackendResponse> {
        if response.is_success() {
            return Ok(response);
        }

        let artifact = self
            .run
            .write_error_artifact(endpoint.name(), &response.body)?;
        let failure = ProtocolError::phase_failed(endpoint.name(), response.status, &artifact);
        error!("{failure}");
        Err(confsync_core::Error::from(failure).into())
    }
}

fn response_json(endpoint: Endpoint, response: &BackendResponse) -> Result<serde_json::Value> {
    Ok(response.json(endpoint)?)
}
