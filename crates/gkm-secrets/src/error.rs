//! Secret manager error types

use thiserror::Error;

/// Secret manager errors
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Invalid master key: expected 64 hexadecimal characters")]
    InvalidMasterKey,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SecretError>;
