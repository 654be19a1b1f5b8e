//! DNS provider abstraction
//!
//! Verification logic talks to DNS through this narrow interface so a
//! concrete provider (e.g. a token-authenticated REST API) can be
//! swapped without touching it.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One DNS record set (name/type pair with its values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Fully qualified record name
    pub name: String,

    /// Record type (e.g. "A", "CNAME")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Time to live in seconds
    pub ttl: u32,

    /// Record values (A record IPs, CNAME targets, ...)
    pub values: Vec<String>,
}

impl DnsRecord {
    /// A record pointing a hostname at a server IP
    pub fn a(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: "A".to_string(),
            ttl: 300,
            values: vec![ip.into()],
        }
    }
}

/// Per-record result of an upsert
///
/// `created`: the name/type pair did not previously exist.
/// `unchanged`: the existing values already matched, nothing written.
/// Neither flag: an existing record's value was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub record: DnsRecord,
    pub created: bool,
    pub unchanged: bool,
}

/// DNS provider interface
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the records currently in a zone
    async fn get_records(&self, domain: &str) -> Result<Vec<DnsRecord>>;

    /// Upsert records into a zone
    ///
    /// Implementations diff each requested record against the current
    /// zone contents and only write what differs; the outcome reports
    /// what happened per record.
    async fn upsert_records(
        &self,
        domain: &str,
        records: Vec<DnsRecord>,
    ) -> Result<Vec<UpsertOutcome>>;
}

/// Diff requested records against the current zone contents
///
/// Records are matched by (name, type); TTL differences alone do not
/// count as a change.
pub fn diff_records(current: &[DnsRecord], requested: &[DnsRecord]) -> Vec<UpsertOutcome> {
    requested
        .iter()
        .map(|req| {
            let existing = current
                .iter()
                .find(|c| c.name == req.name && c.record_type == req.record_type);
            match existing {
                None => UpsertOutcome {
                    record: req.clone(),
                    created: true,
                    unchanged: false,
                },
                Some(existing) if existing.values == req.values => UpsertOutcome {
                    record: req.clone(),
                    created: false,
                    unchanged: true,
                },
                Some(_) => UpsertOutcome {
                    record: req.clone(),
                    created: false,
                    unchanged: false,
                },
            }
        })
        .collect()
}
