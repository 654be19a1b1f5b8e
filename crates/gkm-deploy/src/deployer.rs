//! Remote deployment API collaborator
//!
//! The concrete API that creates applications and services on the
//! deploy target is out of scope for this crate; the orchestrator only
//! talks to it through this narrow trait. Implementations are expected
//! to be idempotent: `ensure_*` either creates the resource or returns
//! the existing one.

use crate::error::Result;
use async_trait::async_trait;
use gkm_core::{AppConfig, ServiceKind};
use std::collections::BTreeMap;

/// Everything the deployment API needs for one app
pub struct AppDeployRequest<'a> {
    pub app_name: &'a str,
    pub app: &'a AppConfig,
    pub stage: &'a str,
    /// Resolved public hostname
    pub hostname: &'a str,
    /// Remote environment id for the stage
    pub environment_id: &'a str,
    /// Fully resolved environment variables
    pub env: &'a BTreeMap<String, String>,
    /// Build arguments (frontend `NEXT_PUBLIC_*` URLs)
    pub build_args: &'a [(String, String)],
    /// Remote id from a previous deploy, when updating in place
    pub existing_id: Option<&'a str>,
}

/// Result of deploying one app
#[derive(Debug, Clone)]
pub struct DeployedApp {
    /// Remote application id
    pub remote_id: String,
    /// Publicly reachable URL
    pub url: String,
}

/// Narrow interface to the remote deployment API
#[async_trait]
pub trait AppDeployer: Send + Sync {
    /// Ensure the stage's environment exists, returning its id
    async fn ensure_environment(&self, workspace: &str, stage: &str) -> Result<String>;

    /// Ensure a backing service exists, returning its remote id
    async fn ensure_service(&self, kind: ServiceKind, stage: &str) -> Result<String>;

    /// Create or update an application, returning its id and URL
    async fn ensure_application(&self, request: &AppDeployRequest<'_>) -> Result<DeployedApp>;
}
