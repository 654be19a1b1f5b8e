//! State store error types

use thiserror::Error;

/// State store errors
#[derive(Error, Debug)]
pub enum StateError {
    #[error(
        "Missing workspace identifier for remote state backend: set `project_id` on the deploy target"
    )]
    MissingProjectId,

    #[error("State backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StateError>;
