//! Deployment orchestrator
//!
//! Walks the workspace's dependency graph in topological order and, for
//! each app: resolves its public hostname, resolves and validates its
//! required environment variables (which may reference already-deployed
//! predecessors), ensures credentials and generated secrets, deploys
//! through the [`AppDeployer`] collaborator, verifies DNS, and persists
//! state before moving on to dependents.
//!
//! State is written after every app: a failed run leaves its partial
//! progress durable, and a retry resumes from it instead of re-creating
//! resources or rotating secrets. Nothing is rolled back.

use crate::deployer::{AppDeployRequest, AppDeployer, DeployedApp};
use crate::error::{DeployError, Result};
use gkm_core::{AppConfig, ServiceKind, Workspace, build_order};
use gkm_dns::{DnsVerifier, generate_public_url_build_args, is_main_frontend_app, resolve_host};
use gkm_env::{
    EnvAccessor, EnvContext, RecordingAccessor, ValidatingAccessor, format_missing_vars_error,
    validate_env_vars,
};
use gkm_secrets::{
    PostgresSecrets, RabbitmqSecrets, RedisSecrets, SecretsStore, StageSecrets, generate_secret,
};
use gkm_state::{AppCredentials, StateStore};
use std::collections::HashMap;
use std::sync::Arc;

/// An app's env declaration
///
/// Runs once under a [`RecordingAccessor`] to enumerate required names
/// and once under a [`ValidatingAccessor`] against resolved values.
pub type EnvSpec = Box<dyn Fn(&mut dyn EnvAccessor) -> gkm_env::Result<()> + Send + Sync>;

/// Drives a full stage deploy over a validated workspace
pub struct Orchestrator {
    workspace: Workspace,
    store: StateStore,
    secrets: SecretsStore,
    deployer: Arc<dyn AppDeployer>,
    dns: Option<DnsVerifier>,
    env_specs: HashMap<String, EnvSpec>,
    master_key: Option<String>,
}

/// Outcome of a successful stage deploy
#[derive(Debug)]
pub struct StageDeployment {
    pub stage: String,
    /// The order apps were deployed in
    pub order: Vec<String>,
    /// App name → deployed id and URL
    pub deployed: HashMap<String, DeployedApp>,
}

impl Orchestrator {
    pub fn new(
        workspace: Workspace,
        store: StateStore,
        secrets: SecretsStore,
        deployer: Arc<dyn AppDeployer>,
    ) -> Self {
        Self {
            workspace,
            store,
            secrets,
            deployer,
            dns: None,
            env_specs: HashMap::new(),
            master_key: None,
        }
    }

    /// Verify DNS for deployed hostnames through this verifier
    pub fn with_dns_verifier(mut self, verifier: DnsVerifier) -> Self {
        self.dns = Some(verifier);
        self
    }

    /// Master key passed through to `GKM_MASTER_KEY`
    pub fn with_master_key(mut self, key: impl Into<String>) -> Self {
        self.master_key = Some(key.into());
        self
    }

    /// Register an app's env declaration
    pub fn with_env_spec(mut self, app: impl Into<String>, spec: EnvSpec) -> Self {
        self.env_specs.insert(app.into(), spec);
        self
    }

    /// Deploy every app of the workspace to a stage
    pub async fn deploy_stage(&mut self, stage: &str) -> Result<StageDeployment> {
        let workspace = &self.workspace;
        let store = &self.store;
        let secrets_store = &self.secrets;
        let deployer = &self.deployer;
        let env_specs = &self.env_specs;
        let master_key = self.master_key.as_deref();
        let dns = &mut self.dns;

        let order = build_order(workspace)?;
        tracing::info!(stage = %stage, order = ?order, "Starting stage deploy");

        let mut state = store.read_or_create(stage).await?;
        let mut stage_secrets = secrets_store.read_or_create(stage).await?;

        // Remote environment for the stage
        let environment_id = match &state.environment_id {
            Some(id) => id.clone(),
            None => {
                let id = deployer.ensure_environment(&workspace.name, stage).await?;
                tracing::info!(environment_id = %id, "Created remote environment");
                state.environment_id = Some(id.clone());
                store.write(stage, &mut state).await?;
                id
            }
        };

        // Backing services, with synthesized credentials on first deploy
        for kind in workspace.services.requested() {
            if state.get_service_id(kind.as_str()).is_none() {
                let id = deployer.ensure_service(kind, stage).await?;
                tracing::info!(service = %kind, id = %id, "Created backing service");
                state.set_service_id(kind.as_str(), id);
                store.write(stage, &mut state).await?;
            }
            ensure_service_secrets(&mut stage_secrets, kind, &workspace.name, stage);
        }
        secrets_store.write(stage, &stage_secrets).await?;

        let mut dependency_urls: HashMap<String, String> = HashMap::new();
        let mut frontend_urls: Vec<String> = Vec::new();
        let mut deployed: HashMap<String, DeployedApp> = HashMap::new();

        for name in &order {
            let Some(app) = workspace.app(name) else {
                tracing::warn!(app = %name, "App vanished from workspace, skipping");
                continue;
            };
            let target = workspace
                .deploy
                .target(app.deploy_target.as_deref())
                .ok_or_else(|| DeployError::TargetNotConfigured(name.clone()))?;

            let is_main = is_main_frontend_app(name, app, workspace);
            let hostname = resolve_host(name, app, stage, target, is_main)?;
            tracing::info!(app = %name, hostname = %hostname, "Deploying app");

            // Per-app database credentials, generated once
            if workspace.services.postgres.is_some() && state.get_app_credentials(name).is_none() {
                state.set_app_credentials(
                    name.clone(),
                    AppCredentials {
                        db_user: name.clone(),
                        db_password: generate_secret(),
                    },
                );
            }
            let credentials = state.get_app_credentials(name).cloned();

            // Enumerate required variables, then resolve them
            let required = match env_specs.get(name) {
                Some(spec) => {
                    let mut recorder = RecordingAccessor::new();
                    spec(&mut recorder)?;
                    recorder.into_names()
                }
                None => baseline_var_names(app),
            };

            let ctx = EnvContext {
                app_name: name,
                app,
                stage,
                app_hostname: &hostname,
                frontend_urls: &frontend_urls,
                dependency_urls: &dependency_urls,
                app_credentials: credentials.as_ref(),
                postgres: stage_secrets.services.postgres.as_ref(),
                redis: stage_secrets.services.redis.as_ref(),
                user_secrets: Some(&stage_secrets),
                master_key,
            };
            let validation = validate_env_vars(&required, &ctx, &mut state);
            if !validation.valid {
                // Keep secrets generated during resolution durable for the retry
                store.write(stage, &mut state).await?;
                return Err(DeployError::MissingEnv {
                    app: name.clone(),
                    message: format_missing_vars_error(name, &validation.missing, stage),
                });
            }

            // Final pass: the declaration sees real values this time
            if let Some(spec) = env_specs.get(name) {
                let mut validating = ValidatingAccessor::new(&validation.resolved);
                spec(&mut validating)?;
            }

            // Credentials and generated secrets are durable before the
            // deploy attempt, so a failed attempt never rotates them
            store.write(stage, &mut state).await?;

            let build_args = if app.is_frontend() {
                generate_public_url_build_args(app, &dependency_urls)
            } else {
                Vec::new()
            };

            let existing_id = state.get_application_id(name).map(str::to_string);
            let request = AppDeployRequest {
                app_name: name,
                app,
                stage,
                hostname: &hostname,
                environment_id: &environment_id,
                env: &validation.resolved,
                build_args: &build_args,
                existing_id: existing_id.as_deref(),
            };
            let deployed_app = deployer.ensure_application(&request).await?;
            tracing::info!(app = %name, id = %deployed_app.remote_id, url = %deployed_app.url, "App deployed");

            state.set_application_id(name.clone(), deployed_app.remote_id.clone());
            dependency_urls.insert(name.clone(), deployed_app.url.clone());
            if app.is_frontend() {
                frontend_urls.push(deployed_app.url.clone());
            }

            // Externally reachable apps get their DNS verified
            if let Some(verifier) = dns.as_mut()
                && let Some(server_ip) = target.server_ip.as_deref()
                && let Some(zone) = target.base_domain(stage)
            {
                verifier
                    .ensure_host_record(zone, &hostname, server_ip, &mut state)
                    .await?;
            }

            // Durable before dependents start
            store.write(stage, &mut state).await?;
            deployed.insert(name.clone(), deployed_app);
        }

        tracing::info!(stage = %stage, apps = deployed.len(), "Stage deploy complete");
        Ok(StageDeployment {
            stage: stage.to_string(),
            order,
            deployed,
        })
    }
}

/// Default variable set for apps without an env declaration
fn baseline_var_names(app: &AppConfig) -> Vec<String> {
    let mut names = vec!["PORT".to_string(), "NODE_ENV".to_string()];
    for dep in &app.dependencies {
        if app.is_frontend() {
            names.push(format!("NEXT_PUBLIC_{}_URL", dep.to_uppercase()));
        } else {
            names.push(format!("{}_URL", dep.to_uppercase()));
        }
    }
    names
}

/// Synthesize connection descriptors for a freshly created service
///
/// Hosts follow the `{workspace}-{stage}-{service}` container naming
/// convention; passwords are generated once and kept.
fn ensure_service_secrets(
    secrets: &mut StageSecrets,
    kind: ServiceKind,
    workspace: &str,
    stage: &str,
) {
    let host = format!("{workspace}-{stage}-{kind}");
    match kind {
        ServiceKind::Postgres => {
            if secrets.services.postgres.is_none() {
                secrets.set_postgres(PostgresSecrets {
                    host,
                    port: kind.default_port(),
                    user: workspace.to_string(),
                    password: generate_secret(),
                    database: workspace.to_string(),
                });
            }
        }
        ServiceKind::Redis => {
            if secrets.services.redis.is_none() {
                secrets.set_redis(RedisSecrets {
                    host,
                    port: kind.default_port(),
                    password: Some(generate_secret()),
                });
            }
        }
        ServiceKind::Rabbitmq => {
            if secrets.services.rabbitmq.is_none() {
                secrets.set_rabbitmq(RabbitmqSecrets {
                    host,
                    port: kind.default_port(),
                    user: workspace.to_string(),
                    password: generate_secret(),
                    vhost: format!("/{workspace}"),
                });
            }
        }
    }
}
