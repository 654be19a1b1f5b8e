//! GKM deployment orchestrator
//!
//! Turns a validated workspace into a deployed stage: dependency-ordered
//! app deploys, environment resolution, secret and credential lifecycle,
//! DNS verification, and incremental state persistence. The remote
//! deployment API stays behind the [`AppDeployer`] trait.

pub mod deployer;
pub mod error;
pub mod orchestrator;

pub use deployer::{AppDeployRequest, AppDeployer, DeployedApp};
pub use error::{DeployError, Result};
pub use orchestrator::{EnvSpec, Orchestrator, StageDeployment};
