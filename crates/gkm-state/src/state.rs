//! Per-stage deployment state record
//!
//! Tracks everything a deploy run learns about a stage: remote object
//! identifiers, generated secrets, per-app credentials and DNS
//! verification records. Entries are additive: a deploy only adds or
//! overwrites in place, it never deletes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deployment state for one (provider, stage) pair
///
/// Serialized as the `.gkm/deploy-{stage}.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentState {
    /// State provider name (e.g. "local", "ssm")
    pub provider: String,

    /// Stage this record belongs to
    pub stage: String,

    /// Remote environment/project identifier
    #[serde(default)]
    pub environment_id: Option<String>,

    /// App name → remote application id
    #[serde(default)]
    pub applications: HashMap<String, String>,

    /// Service name → remote service id (e.g. "postgres", "redis")
    #[serde(default)]
    pub services: HashMap<String, String>,

    /// App name → database credentials
    #[serde(default)]
    pub app_credentials: HashMap<String, AppCredentials>,

    /// App name → secret name → generated value
    #[serde(default)]
    pub generated_secrets: HashMap<String, HashMap<String, String>>,

    /// Hostname → DNS verification record
    #[serde(default)]
    pub dns_verified: HashMap<String, DnsVerification>,

    /// Timestamp of the last successful write
    pub last_deployed_at: DateTime<Utc>,
}

/// Database credentials generated for one app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCredentials {
    pub db_user: String,
    pub db_password: String,
}

/// A cached fact: hostname H was confirmed to resolve to IP P at time T
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsVerification {
    pub server_ip: String,
    pub verified_at: DateTime<Utc>,
}

impl DeploymentState {
    /// Create an empty state for the first deploy of a stage
    pub fn new(provider: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            stage: stage.into(),
            environment_id: None,
            applications: HashMap::new(),
            services: HashMap::new(),
            app_credentials: HashMap::new(),
            generated_secrets: HashMap::new(),
            dns_verified: HashMap::new(),
            last_deployed_at: Utc::now(),
        }
    }

    pub fn get_application_id(&self, app: &str) -> Option<&str> {
        self.applications.get(app).map(String::as_str)
    }

    pub fn set_application_id(&mut self, app: impl Into<String>, id: impl Into<String>) {
        self.applications.insert(app.into(), id.into());
    }

    pub fn all_applications(&self) -> &HashMap<String, String> {
        &self.applications
    }

    pub fn get_service_id(&self, service: &str) -> Option<&str> {
        self.services.get(service).map(String::as_str)
    }

    pub fn set_service_id(&mut self, service: impl Into<String>, id: impl Into<String>) {
        self.services.insert(service.into(), id.into());
    }

    pub fn all_services(&self) -> &HashMap<String, String> {
        &self.services
    }

    pub fn get_postgres_id(&self) -> Option<&str> {
        self.get_service_id("postgres")
    }

    pub fn set_postgres_id(&mut self, id: impl Into<String>) {
        self.set_service_id("postgres", id);
    }

    pub fn get_redis_id(&self) -> Option<&str> {
        self.get_service_id("redis")
    }

    pub fn set_redis_id(&mut self, id: impl Into<String>) {
        self.set_service_id("redis", id);
    }

    pub fn get_app_credentials(&self, app: &str) -> Option<&AppCredentials> {
        self.app_credentials.get(app)
    }

    pub fn set_app_credentials(&mut self, app: impl Into<String>, credentials: AppCredentials) {
        self.app_credentials.insert(app.into(), credentials);
    }

    pub fn get_generated_secret(&self, app: &str, name: &str) -> Option<&str> {
        self.generated_secrets
            .get(app)
            .and_then(|secrets| secrets.get(name))
            .map(String::as_str)
    }

    pub fn set_generated_secret(
        &mut self,
        app: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.generated_secrets
            .entry(app.into())
            .or_default()
            .insert(name.into(), value.into());
    }

    pub fn all_generated_secrets(&self, app: &str) -> Option<&HashMap<String, String>> {
        self.generated_secrets.get(app)
    }

    pub fn get_dns_verification(&self, hostname: &str) -> Option<&DnsVerification> {
        self.dns_verified.get(hostname)
    }

    pub fn set_dns_verification(&mut self, hostname: impl Into<String>, server_ip: impl Into<String>) {
        self.dns_verified.insert(
            hostname.into(),
            DnsVerification {
                server_ip: server_ip.into(),
                verified_at: Utc::now(),
            },
        );
    }

    pub fn all_dns_verifications(&self) -> &HashMap<String, DnsVerification> {
        &self.dns_verified
    }
}
