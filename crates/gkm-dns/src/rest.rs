//! REST zone-API provider
//!
//! Token-authenticated HTTP implementation of [`DnsProvider`] against a
//! zone API exposing `GET /zones/{domain}` and `PUT /zones/{domain}`.
//! Authentication failures surface as provider errors with the API's
//! own message, never as empty results.

use crate::error::{DnsError, Result};
use crate::provider::{DnsProvider, DnsRecord, UpsertOutcome, diff_records};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Zone API client configuration
#[derive(Debug, Clone)]
pub struct ZoneApiConfig {
    pub base_url: String,
    pub api_token: String,
}

impl ZoneApiConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("GKM_DNS_API_URL")
            .map_err(|_| DnsError::MissingEnvVar("GKM_DNS_API_URL".to_string()))?;
        let api_token = std::env::var("GKM_DNS_API_TOKEN")
            .map_err(|_| DnsError::MissingEnvVar("GKM_DNS_API_TOKEN".to_string()))?;
        Ok(Self {
            base_url,
            api_token,
        })
    }
}

/// Token-authenticated zone API provider
pub struct ZoneApiProvider {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl ZoneApiProvider {
    pub fn new(config: ZoneApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
        }
    }

    fn zone_url(&self, domain: &str) -> String {
        format!("{}/zones/{}", self.base_url, domain)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(DnsError::Auth(format!("{status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DnsError::Api(format!("{status}: {body}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl DnsProvider for ZoneApiProvider {
    async fn get_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let response = self
            .client
            .get(self.zone_url(domain))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let sets: Vec<ApiRecordSet> = response.json().await?;
        Ok(sets.into_iter().map(DnsRecord::from).collect())
    }

    async fn upsert_records(
        &self,
        domain: &str,
        records: Vec<DnsRecord>,
    ) -> Result<Vec<UpsertOutcome>> {
        let current = self.get_records(domain).await?;
        let outcomes = diff_records(&current, &records);

        let to_write: Vec<ApiRecordSet> = outcomes
            .iter()
            .filter(|outcome| !outcome.unchanged)
            .map(|outcome| ApiRecordSet::from(&outcome.record))
            .collect();

        if to_write.is_empty() {
            tracing::debug!(domain = %domain, "All requested DNS records already match");
            return Ok(outcomes);
        }

        tracing::info!(
            domain = %domain,
            count = to_write.len(),
            "Upserting DNS records"
        );
        let response = self
            .client
            .put(self.zone_url(domain))
            .bearer_auth(&self.api_token)
            .json(&to_write)
            .send()
            .await?;
        Self::check_status(response).await?;

        Ok(outcomes)
    }
}

// ============ API Types ============

#[derive(Debug, Serialize, Deserialize)]
struct ApiRecordSet {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    ttl: u32,
    records: Vec<ApiRecordValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiRecordValue {
    content: String,
}

impl From<ApiRecordSet> for DnsRecord {
    fn from(set: ApiRecordSet) -> Self {
        DnsRecord {
            name: set.name,
            record_type: set.record_type,
            ttl: set.ttl,
            values: set.records.into_iter().map(|r| r.content).collect(),
        }
    }
}

impl From<&DnsRecord> for ApiRecordSet {
    fn from(record: &DnsRecord) -> Self {
        ApiRecordSet {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            ttl: record.ttl,
            records: record
                .values
                .iter()
                .map(|value| ApiRecordValue {
                    content: value.clone(),
                })
                .collect(),
        }
    }
}
