//! Pluggable state storage backends
//!
//! A `StateProvider` persists one `DeploymentState` document per stage.
//! The local provider writes `.gkm/deploy-{stage}.json` under the
//! workspace root; the parameter-store provider keeps the same document
//! in a remote key/value parameter backend with a local read cache.

use crate::error::{Result, StateError};
use crate::state::DeploymentState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

const STATE_DIR: &str = ".gkm";

/// Storage backend for per-stage deployment state
#[async_trait]
pub trait StateProvider: Send + Sync {
    /// Read the state for a stage
    ///
    /// Returns `None` when no state exists yet. A corrupt document is
    /// also reported as `None`; the caller proceeds as a first deploy.
    async fn read(&self, stage: &str) -> Result<Option<DeploymentState>>;

    /// Persist the full state document for a stage
    async fn write(&self, stage: &str, state: &DeploymentState) -> Result<()>;
}

/// Local file-backed state provider
pub struct LocalStateProvider {
    root: PathBuf,
}

impl LocalStateProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn state_path(&self, stage: &str) -> PathBuf {
        self.root.join(STATE_DIR).join(format!("deploy-{stage}.json"))
    }
}

#[async_trait]
impl StateProvider for LocalStateProvider {
    async fn read(&self, stage: &str) -> Result<Option<DeploymentState>> {
        let path = self.state_path(stage);
        if !path.exists() {
            tracing::debug!(stage = %stage, "State file not found");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                // Corruption degrades to "no prior state", never a fatal error
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "State file is unreadable, treating as first deploy"
                );
                Ok(None)
            }
        }
    }

    async fn write(&self, stage: &str, state: &DeploymentState) -> Result<()> {
        let path = self.state_path(stage);
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        // Temp-then-rename keeps concurrent readers off a half-written file
        let content = serde_json::to_string_pretty(state)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(stage = %stage, path = %path.display(), "Saved deployment state");
        Ok(())
    }
}

/// Narrow interface to a remote key/value parameter backend
///
/// An SSM-style store implements exactly this; the provider logic below
/// never talks to a concrete remote API.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<String>>;
    async fn put(&self, name: &str, value: &str) -> Result<()>;
}

/// Parameter-store-backed provider with a local read cache
///
/// Reads are cached for the life of the run; writes update the cache and
/// the remote parameter. Construction fails fast when the workspace
/// identifier required to namespace parameters is missing.
pub struct ParameterStoreProvider {
    store: Arc<dyn ParameterStore>,
    project_id: String,
    cache: Mutex<HashMap<String, DeploymentState>>,
}

impl ParameterStoreProvider {
    pub fn new(store: Arc<dyn ParameterStore>, project_id: Option<&str>) -> Result<Self> {
        let project_id = project_id.ok_or(StateError::MissingProjectId)?;
        Ok(Self {
            store,
            project_id: project_id.to_string(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn parameter_name(&self, stage: &str) -> String {
        format!("/gkm/{}/deploy/{}", self.project_id, stage)
    }
}

#[async_trait]
impl StateProvider for ParameterStoreProvider {
    async fn read(&self, stage: &str) -> Result<Option<DeploymentState>> {
        {
            let cache = self.cache.lock().await;
            if let Some(state) = cache.get(stage) {
                tracing::debug!(stage = %stage, "State served from local cache");
                return Ok(Some(state.clone()));
            }
        }

        let name = self.parameter_name(stage);
        let Some(content) = self.store.get(&name).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<DeploymentState>(&content) {
            Ok(state) => {
                self.cache.lock().await.insert(stage.to_string(), state.clone());
                Ok(Some(state))
            }
            Err(e) => {
                tracing::warn!(
                    parameter = %name,
                    error = %e,
                    "Remote state parameter is unreadable, treating as first deploy"
                );
                Ok(None)
            }
        }
    }

    async fn write(&self, stage: &str, state: &DeploymentState) -> Result<()> {
        let name = self.parameter_name(stage);
        let content = serde_json::to_string(state)?;
        self.store.put(&name, &content).await?;
        self.cache
            .lock()
            .await
            .insert(stage.to_string(), state.clone());
        tracing::debug!(stage = %stage, parameter = %name, "Saved deployment state to parameter store");
        Ok(())
    }
}
