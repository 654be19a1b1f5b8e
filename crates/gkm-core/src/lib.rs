//! GKM ワークスペースモデルと依存関係グラフ
//!
//! マルチアプリワークスペースの型定義と、デプロイ順序を決定する
//! トポロジカルソートを提供する。設定ファイルのパースは上位層の責務で、
//! このクレートは検証済みの型付きモデルのみを扱う。

pub mod error;
pub mod graph;
pub mod model;

pub use error::{ConfigError, Result};
pub use graph::{build_order, validate_dependencies};
pub use model::app::{AppConfig, AppType, DomainConfig};
pub use model::deploy::{DeployConfig, TargetConfig};
pub use model::service::{ServiceKind, ServiceRequest, ServicesConfig};
pub use model::workspace::{SharedConfig, Workspace};
