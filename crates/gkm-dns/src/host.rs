//! Public hostname resolution
//!
//! Computes the hostname an app is served from for a given stage, and
//! derives the `NEXT_PUBLIC_*` build arguments frontends embed at build
//! time.

use crate::error::{DnsError, Result};
use gkm_core::{AppConfig, TargetConfig, Workspace};
use std::collections::HashMap;

/// Resolve the public hostname for an app on a stage
///
/// Precedence: a literal `domain` is returned verbatim; a per-stage
/// domain map is consulted for the current stage; otherwise the hostname
/// is computed as `{app}.{base}` from the target's base domain, or the
/// bare base domain for the main frontend. A stage with no base domain
/// configured is a hard error, never an empty or wildcard host.
pub fn resolve_host(
    app_name: &str,
    app: &AppConfig,
    stage: &str,
    target: &TargetConfig,
    is_main_frontend: bool,
) -> Result<String> {
    if let Some(domain) = &app.domain
        && let Some(host) = domain.for_stage(stage)
    {
        return Ok(host.to_string());
    }

    let base = target
        .base_domain(stage)
        .ok_or_else(|| DnsError::NoDomainForStage(stage.to_string()))?;

    if is_main_frontend {
        Ok(base.to_string())
    } else {
        Ok(format!("{app_name}.{base}"))
    }
}

/// Whether this app is the workspace's main frontend
///
/// True only for frontend apps: the app literally named `web` wins;
/// when no `web` app exists, the first frontend in declared workspace
/// order takes the role.
pub fn is_main_frontend_app(name: &str, app: &AppConfig, workspace: &Workspace) -> bool {
    if !app.is_frontend() {
        return false;
    }
    if name == "web" {
        return true;
    }
    if workspace.app("web").is_some() {
        return false;
    }
    workspace
        .apps()
        .find(|(_, candidate)| candidate.is_frontend())
        .is_some_and(|(first, _)| first == name)
}

/// Variable names a frontend build will receive for its dependencies
pub fn public_url_arg_names(app: &AppConfig) -> Vec<String> {
    app.dependencies
        .iter()
        .map(|dep| public_url_arg_name(dep))
        .collect()
}

/// Build arguments for each dependency with a deployed URL
///
/// Dependencies that have not published a URL yet are skipped, not an
/// error; the caller decides whether the omission is acceptable.
pub fn generate_public_url_build_args(
    app: &AppConfig,
    deployed_urls: &HashMap<String, String>,
) -> Vec<(String, String)> {
    app.dependencies
        .iter()
        .filter_map(|dep| match deployed_urls.get(dep) {
            Some(url) => Some((public_url_arg_name(dep), url.clone())),
            None => {
                tracing::debug!(dependency = %dep, "No deployed URL yet, skipping build arg");
                None
            }
        })
        .collect()
}

fn public_url_arg_name(dep: &str) -> String {
    // Upper-cased dependency name; punctuation is preserved as-is
    format!("NEXT_PUBLIC_{}_URL", dep.to_uppercase())
}
