//! Stage-scoped secrets record
//!
//! One record per stage, persisted as `.gkm/secrets/{stage}.json` under
//! the workspace root. Holds structured connection descriptors for the
//! backing services plus operator-supplied URLs and custom values.
//! Mutations go through the explicit `set_*` operations, which bump
//! `updatedAt`.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const SECRETS_DIR: &str = ".gkm/secrets";

/// Secrets for one stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSecrets {
    pub stage: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Structured connection descriptors for backing services
    #[serde(default)]
    pub services: ServiceSecrets,

    /// Pre-resolved connection strings, keyed by variable name
    #[serde(default)]
    pub urls: HashMap<String, String>,

    /// Arbitrary operator-supplied secrets, keyed by variable name
    #[serde(default)]
    pub custom: HashMap<String, String>,
}

/// Connection descriptors for the configured services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSecrets {
    #[serde(default)]
    pub postgres: Option<PostgresSecrets>,
    #[serde(default)]
    pub redis: Option<RedisSecrets>,
    #[serde(default)]
    pub rabbitmq: Option<RabbitmqSecrets>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresSecrets {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisSecrets {
    pub host: String,
    pub port: u16,
    /// No password means an unauthenticated instance
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RabbitmqSecrets {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub vhost: String,
}

impl StageSecrets {
    pub fn new(stage: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            stage: stage.into(),
            created_at: now,
            updated_at: now,
            services: ServiceSecrets::default(),
            urls: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    pub fn set_custom(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.custom.insert(name.into(), value.into());
        self.touch();
    }

    pub fn set_url(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.urls.insert(name.into(), value.into());
        self.touch();
    }

    pub fn set_postgres(&mut self, postgres: PostgresSecrets) {
        self.services.postgres = Some(postgres);
        self.touch();
    }

    pub fn set_redis(&mut self, redis: RedisSecrets) {
        self.services.redis = Some(redis);
        self.touch();
    }

    pub fn set_rabbitmq(&mut self, rabbitmq: RabbitmqSecrets) {
        self.services.rabbitmq = Some(rabbitmq);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// File store for stage secrets
pub struct SecretsStore {
    root: PathBuf,
}

impl SecretsStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn secrets_path(&self, stage: &str) -> PathBuf {
        self.root.join(SECRETS_DIR).join(format!("{stage}.json"))
    }

    /// Read the secrets for a stage, `None` when the file is absent
    ///
    /// Unlike deployment state, a corrupt secrets file is an error:
    /// silently discarding operator-supplied secrets is not recoverable.
    pub async fn read(&self, stage: &str) -> Result<Option<StageSecrets>> {
        let path = self.secrets_path(stage);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub async fn read_or_create(&self, stage: &str) -> Result<StageSecrets> {
        match self.read(stage).await? {
            Some(secrets) => Ok(secrets),
            None => Ok(StageSecrets::new(stage)),
        }
    }

    pub async fn write(&self, stage: &str, secrets: &StageSecrets) -> Result<()> {
        let path = self.secrets_path(stage);
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(secrets)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(stage = %stage, "Saved stage secrets");
        Ok(())
    }
}
