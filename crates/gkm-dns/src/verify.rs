//! DNS verification workflow
//!
//! A verification is the cached fact "hostname H points at IP P". The
//! persisted record lives in the deployment state; an additional in-run
//! cache avoids re-querying the provider for hostnames already handled
//! during the same run. The cache is an explicitly constructed object
//! with a `clear()` for test isolation.

use crate::error::Result;
use crate::provider::{DnsProvider, DnsRecord};
use gkm_state::DeploymentState;
use std::collections::HashMap;
use std::sync::Arc;

/// True only when a verification record exists and its IP matches exactly
///
/// Any IP change invalidates the cached verification.
pub fn is_dns_verified(state: &DeploymentState, hostname: &str, expected_ip: &str) -> bool {
    state
        .get_dns_verification(hostname)
        .is_some_and(|record| record.server_ip == expected_ip)
}

/// In-run verification cache
#[derive(Debug, Default)]
pub struct VerificationCache {
    verified: HashMap<String, String>,
}

impl VerificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_verified(&self, hostname: &str, ip: &str) -> bool {
        self.verified.get(hostname).is_some_and(|cached| cached == ip)
    }

    pub fn mark(&mut self, hostname: impl Into<String>, ip: impl Into<String>) {
        self.verified.insert(hostname.into(), ip.into());
    }

    pub fn clear(&mut self) {
        self.verified.clear();
    }
}

/// Drives the check → upsert → record workflow for one hostname at a time
pub struct DnsVerifier {
    provider: Arc<dyn DnsProvider>,
    cache: VerificationCache,
}

impl DnsVerifier {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self {
            provider,
            cache: VerificationCache::new(),
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Ensure `hostname` has an A record pointing at `server_ip`
    ///
    /// Returns `true` when the provider was consulted, `false` when a
    /// cached verification (in-run or persisted) was still valid. The
    /// verification record is written to state either way a fresh check
    /// succeeds.
    pub async fn ensure_host_record(
        &mut self,
        zone: &str,
        hostname: &str,
        server_ip: &str,
        state: &mut DeploymentState,
    ) -> Result<bool> {
        if self.cache.is_verified(hostname, server_ip) {
            tracing::debug!(hostname = %hostname, "DNS already verified in this run");
            return Ok(false);
        }
        if is_dns_verified(state, hostname, server_ip) {
            tracing::debug!(hostname = %hostname, "DNS verification still valid from a prior run");
            self.cache.mark(hostname, server_ip);
            return Ok(false);
        }

        let outcomes = self
            .provider
            .upsert_records(zone, vec![DnsRecord::a(hostname, server_ip)])
            .await?;

        for outcome in &outcomes {
            if outcome.created {
                tracing::info!(record = %outcome.record.name, ip = %server_ip, "Created DNS record");
            } else if outcome.unchanged {
                tracing::debug!(record = %outcome.record.name, "DNS record already correct");
            } else {
                tracing::info!(record = %outcome.record.name, ip = %server_ip, "Updated DNS record");
            }
        }

        state.set_dns_verification(hostname, server_ip);
        self.cache.mark(hostname, server_ip);
        Ok(true)
    }
}
