//! GKM hostname resolution and DNS verification
//!
//! Computes the public hostname for an app on a stage, derives the
//! `NEXT_PUBLIC_*` build arguments frontends embed, and verifies that
//! hostnames point at the right server IP through a pluggable
//! [`DnsProvider`]. Verification results are cached in the deployment
//! state and invalidated the moment the expected IP changes.

pub mod error;
pub mod host;
pub mod provider;
pub mod rest;
pub mod verify;

pub use error::{DnsError, Result};
pub use host::{
    generate_public_url_build_args, is_main_frontend_app, public_url_arg_names, resolve_host,
};
pub use provider::{DnsProvider, DnsRecord, UpsertOutcome, diff_records};
pub use rest::{ZoneApiConfig, ZoneApiProvider};
pub use verify::{DnsVerifier, VerificationCache, is_dns_verified};
