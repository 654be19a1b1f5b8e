//! Environment resolver error types

use thiserror::Error;

/// Environment resolution errors
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Validation failure; the message already names the variable
    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, EnvError>;
