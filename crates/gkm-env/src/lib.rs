//! GKM environment variable resolution
//!
//! Turns a required-variable name plus a per-app resolution context into
//! a concrete value, or reports it missing. Resolution gaps are not
//! exceptions: they are collected and rendered as one aggregate,
//! actionable diagnostic so an operator sees every gap at once.
//!
//! The same env declaration can run under a [`RecordingAccessor`] to
//! enumerate names before deploy and a [`ValidatingAccessor`] against
//! resolved values: two implementations of one interface, selected by
//! the caller.

pub mod accessor;
pub mod context;
pub mod error;
pub mod resolver;
pub mod url;
pub mod validate;

pub use accessor::{EnvAccessor, RecordingAccessor, ValidatingAccessor};
pub use context::EnvContext;
pub use error::{EnvError, Result};
pub use resolver::{
    EnvValidation, ResolvedEnv, format_missing_vars_error, resolve_env_var, resolve_env_vars,
    validate_env_vars,
};
pub use url::{build_database_url, build_redis_url, encode_component};
pub use validate::{Contextual, Rules, VarValidator};
