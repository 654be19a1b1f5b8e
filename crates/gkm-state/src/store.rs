//! State store front-end
//!
//! Thin wrapper over a `StateProvider` that owns the read-or-create and
//! timestamp-refresh discipline. Writes are whole-document; the single
//! writer per (provider, stage) is the caller's responsibility.

use crate::error::Result;
use crate::provider::{LocalStateProvider, StateProvider};
use crate::state::DeploymentState;
use chrono::Utc;
use std::path::Path;

/// Per-stage deployment state store
pub struct StateStore {
    provider_name: String,
    provider: Box<dyn StateProvider>,
}

impl StateStore {
    /// Store backed by `.gkm/deploy-{stage}.json` under the workspace root
    pub fn local(root: impl AsRef<Path>) -> Self {
        Self {
            provider_name: "local".to_string(),
            provider: Box::new(LocalStateProvider::new(root)),
        }
    }

    /// Store backed by an arbitrary provider implementation
    pub fn with_provider(name: impl Into<String>, provider: Box<dyn StateProvider>) -> Self {
        Self {
            provider_name: name.into(),
            provider,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Read the persisted state, `None` when absent or unreadable
    pub async fn read(&self, stage: &str) -> Result<Option<DeploymentState>> {
        self.provider.read(stage).await
    }

    /// Read the persisted state, or start an empty record for a first deploy
    pub async fn read_or_create(&self, stage: &str) -> Result<DeploymentState> {
        match self.provider.read(stage).await? {
            Some(state) => Ok(state),
            None => {
                tracing::info!(stage = %stage, "No prior deployment state, starting fresh");
                Ok(DeploymentState::new(self.provider_name.clone(), stage))
            }
        }
    }

    /// Persist the full record, refreshing `lastDeployedAt`
    pub async fn write(&self, stage: &str, state: &mut DeploymentState) -> Result<()> {
        state.last_deployed_at = Utc::now();
        self.provider.write(stage, state).await
    }
}
