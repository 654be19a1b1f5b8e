//! Shared fixtures for orchestrator integration tests

use async_trait::async_trait;
use gkm_core::{
    AppConfig, AppType, DeployConfig, ServiceKind, ServiceRequest, ServicesConfig, SharedConfig,
    TargetConfig, Workspace,
};
use gkm_deploy::{AppDeployRequest, AppDeployer, DeployedApp};
use gkm_dns::{DnsProvider, DnsRecord, UpsertOutcome, diff_records};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const SERVER_IP: &str = "203.0.113.10";

/// One recorded `ensure_application` call
pub struct RecordedRequest {
    pub app_name: String,
    pub hostname: String,
    pub env: BTreeMap<String, String>,
    pub build_args: Vec<(String, String)>,
    pub existing_id: Option<String>,
}

/// In-memory deployment API double
pub struct MockDeployer {
    counter: Mutex<u32>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl MockDeployer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            counter: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_for(&self, app: &str) -> Option<RecordedRequest> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.iter().rposition(|r| r.app_name == app)?;
        Some(requests.remove(index))
    }
}

#[async_trait]
impl AppDeployer for MockDeployer {
    async fn ensure_environment(&self, workspace: &str, stage: &str) -> gkm_deploy::Result<String> {
        Ok(format!("env-{workspace}-{stage}"))
    }

    async fn ensure_service(&self, kind: ServiceKind, stage: &str) -> gkm_deploy::Result<String> {
        Ok(format!("svc-{kind}-{stage}"))
    }

    async fn ensure_application(
        &self,
        request: &AppDeployRequest<'_>,
    ) -> gkm_deploy::Result<DeployedApp> {
        self.requests.lock().unwrap().push(RecordedRequest {
            app_name: request.app_name.to_string(),
            hostname: request.hostname.to_string(),
            env: request.env.clone(),
            build_args: request.build_args.to_vec(),
            existing_id: request.existing_id.map(str::to_string),
        });

        // Reuse the remote id when updating in place
        let remote_id = match request.existing_id {
            Some(id) => id.to_string(),
            None => {
                let mut counter = self.counter.lock().unwrap();
                *counter += 1;
                format!("app-{}", counter)
            }
        };
        Ok(DeployedApp {
            remote_id,
            url: format!("https://{}", request.hostname),
        })
    }
}

/// In-memory DNS zone double
pub struct MemoryDnsProvider {
    zone: Mutex<Vec<DnsRecord>>,
    pub upserts: Mutex<usize>,
}

impl MemoryDnsProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            zone: Mutex::new(Vec::new()),
            upserts: Mutex::new(0),
        })
    }

    pub fn record_for(&self, name: &str) -> Option<DnsRecord> {
        self.zone
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }
}

#[async_trait]
impl DnsProvider for MemoryDnsProvider {
    async fn get_records(&self, _domain: &str) -> gkm_dns::Result<Vec<DnsRecord>> {
        Ok(self.zone.lock().unwrap().clone())
    }

    async fn upsert_records(
        &self,
        _domain: &str,
        records: Vec<DnsRecord>,
    ) -> gkm_dns::Result<Vec<UpsertOutcome>> {
        *self.upserts.lock().unwrap() += 1;
        let mut zone = self.zone.lock().unwrap();
        let outcomes = diff_records(&zone, &records);
        for outcome in &outcomes {
            if !outcome.unchanged {
                zone.retain(|r| {
                    !(r.name == outcome.record.name && r.record_type == outcome.record.record_type)
                });
                zone.push(outcome.record.clone());
            }
        }
        Ok(outcomes)
    }
}

pub fn app(app_type: AppType, port: u16, deps: &[&str]) -> AppConfig {
    AppConfig {
        app_type,
        path: PathBuf::from("apps/test"),
        port,
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        domain: None,
        client_output: None,
        deploy_target: None,
    }
}

/// Three-app workspace: web → {api, auth}, auth → api
pub fn workspace(root: &Path) -> Workspace {
    let mut domains = HashMap::new();
    domains.insert("production".to_string(), "myapp.com".to_string());

    let mut targets = HashMap::new();
    targets.insert(
        "main".to_string(),
        TargetConfig {
            base_url: Some("https://deploy.example.com".to_string()),
            server_ip: Some(SERVER_IP.to_string()),
            domains: Some(domains),
            project_id: Some("proj-1".to_string()),
        },
    );

    Workspace::new(
        "myapp",
        root,
        vec![
            ("api".to_string(), app(AppType::Backend, 3001, &[])),
            ("auth".to_string(), app(AppType::Backend, 3002, &["api"])),
            (
                "web".to_string(),
                app(AppType::Frontend, 3000, &["api", "auth"]),
            ),
        ],
        ServicesConfig {
            postgres: Some(ServiceRequest::default()),
            redis: Some(ServiceRequest::default()),
            rabbitmq: None,
        },
        DeployConfig {
            default_target: Some("main".to_string()),
            targets,
        },
        SharedConfig::default(),
    )
    .unwrap()
}
