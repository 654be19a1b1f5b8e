//! Resolution context
//!
//! Ephemeral view assembled per app per stage. Everything is borrowed;
//! the mutable `DeploymentState` travels alongside the context as an
//! explicit parameter of the resolver functions.

use gkm_core::AppConfig;
use gkm_state::AppCredentials;
use gkm_secrets::{PostgresSecrets, RedisSecrets, StageSecrets};
use std::collections::HashMap;

/// Per-app resolution inputs
#[derive(Clone, Copy)]
pub struct EnvContext<'a> {
    /// Name of the app being deployed
    pub app_name: &'a str,
    /// The app's configuration
    pub app: &'a AppConfig,
    /// Stage being deployed
    pub stage: &'a str,
    /// The app's resolved public hostname
    pub app_hostname: &'a str,
    /// Deployed frontend URLs, for CORS/trusted-origin variables
    pub frontend_urls: &'a [String],
    /// Dependency name → deployed URL, for already-deployed predecessors
    pub dependency_urls: &'a HashMap<String, String>,
    /// Database credentials generated for this app
    pub app_credentials: Option<&'a AppCredentials>,
    /// Postgres connection descriptor for the stage
    pub postgres: Option<&'a PostgresSecrets>,
    /// Redis connection descriptor for the stage
    pub redis: Option<&'a RedisSecrets>,
    /// Operator-supplied override layer
    pub user_secrets: Option<&'a StageSecrets>,
    /// Master encryption key, passed through verbatim
    pub master_key: Option<&'a str>,
}
