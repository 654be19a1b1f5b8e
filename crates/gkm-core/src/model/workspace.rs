//! ワークスペース定義

use super::app::AppConfig;
use super::deploy::DeployConfig;
use super::service::ServicesConfig;
use crate::error::Result;
use crate::graph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// ワークスペース - 1プロジェクトの全アプリと依存関係
///
/// アプリは宣言順を保持する。ビルド順序とメインフロントエンド判定は
/// 列挙順に依存するため、HashMapではなくVecで保持している。
///
/// 依存関係の検証（未定義依存・自己依存・循環依存）は構築時に実行され、
/// デプロイ時ではなくI/Oの前に失敗する。
#[derive(Debug, Clone)]
pub struct Workspace {
    /// ワークスペース名
    pub name: String,
    /// ワークスペースルート
    pub root: PathBuf,
    /// アプリ定義（宣言順）
    apps: Vec<(String, AppConfig)>,
    /// バッキングサービス設定
    pub services: ServicesConfig,
    /// デプロイ設定
    pub deploy: DeployConfig,
    /// 共有設定
    pub shared: SharedConfig,
}

impl Workspace {
    /// ワークスペースを構築し、依存関係グラフを即時検証する
    pub fn new(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        apps: Vec<(String, AppConfig)>,
        services: ServicesConfig,
        deploy: DeployConfig,
        shared: SharedConfig,
    ) -> Result<Self> {
        graph::validate_dependencies(&apps)?;
        let workspace = Self {
            name: name.into(),
            root: root.into(),
            apps,
            services,
            deploy,
            shared,
        };
        // 循環依存も構築時に検出する
        graph::build_order(&workspace)?;
        Ok(workspace)
    }

    /// アプリ定義を名前で取得
    pub fn app(&self, name: &str) -> Option<&AppConfig> {
        self.apps
            .iter()
            .find(|(app_name, _)| app_name == name)
            .map(|(_, app)| app)
    }

    /// アプリを宣言順に列挙
    pub fn apps(&self) -> impl Iterator<Item = (&str, &AppConfig)> {
        self.apps.iter().map(|(name, app)| (name.as_str(), app))
    }

    /// アプリ名を宣言順に列挙
    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(|(name, _)| name.as_str())
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }
}

/// 全アプリで共有される設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedConfig {
    /// 共有環境変数
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::app::AppType;

    fn app(deps: &[&str]) -> AppConfig {
        AppConfig {
            app_type: AppType::Backend,
            path: PathBuf::from("apps/test"),
            port: 3000,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            domain: None,
            client_output: None,
            deploy_target: None,
        }
    }

    #[test]
    fn test_workspace_preserves_declared_order() {
        let workspace = Workspace::new(
            "myapp",
            "/tmp/myapp",
            vec![
                ("api".to_string(), app(&[])),
                ("auth".to_string(), app(&["api"])),
                ("web".to_string(), app(&["api", "auth"])),
            ],
            ServicesConfig::default(),
            DeployConfig::default(),
            SharedConfig::default(),
        )
        .unwrap();

        let names: Vec<&str> = workspace.app_names().collect();
        assert_eq!(names, vec!["api", "auth", "web"]);
    }

    #[test]
    fn test_workspace_rejects_unknown_dependency() {
        let result = Workspace::new(
            "myapp",
            "/tmp/myapp",
            vec![("api".to_string(), app(&["missing"]))],
            ServicesConfig::default(),
            DeployConfig::default(),
            SharedConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_workspace_rejects_self_dependency() {
        let result = Workspace::new(
            "myapp",
            "/tmp/myapp",
            vec![("api".to_string(), app(&["api"]))],
            ServicesConfig::default(),
            DeployConfig::default(),
            SharedConfig::default(),
        );
        assert!(result.is_err());
    }
}
