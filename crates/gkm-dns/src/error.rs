//! DNS resolver error types

use thiserror::Error;

/// Host/DNS resolution errors
#[derive(Error, Debug)]
pub enum DnsError {
    #[error(
        "No domain configured for stage '{0}': add a base domain for this stage to the deploy target"
    )]
    NoDomainForStage(String),

    #[error("DNS provider authentication failed: {0}")]
    Auth(String),

    #[error("DNS provider API error: {0}")]
    Api(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DnsError>;
