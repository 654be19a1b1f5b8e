//! Orchestrator error types

use thiserror::Error;

/// Deployment orchestration errors
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] gkm_core::ConfigError),

    #[error(transparent)]
    State(#[from] gkm_state::StateError),

    #[error(transparent)]
    Secret(#[from] gkm_secrets::SecretError),

    #[error(transparent)]
    Env(#[from] gkm_env::EnvError),

    #[error(transparent)]
    Dns(#[from] gkm_dns::DnsError),

    /// Aggregate missing-variable report; the message lists every gap
    /// with its remediation command
    #[error("{message}")]
    MissingEnv { app: String, message: String },

    #[error("No deploy target configured for app '{0}'")]
    TargetNotConfigured(String),

    #[error("Deployment API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, DeployError>;
