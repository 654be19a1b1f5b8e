//! デプロイターゲット設定

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// デプロイ設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// デフォルトのターゲット名
    #[serde(default)]
    pub default_target: Option<String>,
    /// ターゲット名 → ターゲット設定
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

impl DeployConfig {
    /// 名前指定またはデフォルトのターゲットを返す
    pub fn target(&self, name: Option<&str>) -> Option<&TargetConfig> {
        let name = name.or(self.default_target.as_deref())?;
        self.targets.get(name)
    }
}

/// デプロイターゲット設定
///
/// リモートデプロイAPIのエンドポイントと、ステージごとの
/// 公開ドメイン・サーバーIPを保持する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// デプロイAPIのベースURL
    #[serde(default)]
    pub base_url: Option<String>,
    /// DNSレコードが指すべきサーバーIP
    #[serde(default)]
    pub server_ip: Option<String>,
    /// ステージ名 → ベースドメイン
    #[serde(default)]
    pub domains: Option<HashMap<String, String>>,
    /// リモートステートバックエンド用のプロジェクト識別子
    #[serde(default)]
    pub project_id: Option<String>,
}

impl TargetConfig {
    /// ステージのベースドメインを返す
    ///
    /// domainsマップ自体が無い場合も含めて、エントリが無ければNone。
    pub fn base_domain(&self, stage: &str) -> Option<&str> {
        self.domains.as_ref()?.get(stage).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_default_fallback() {
        let mut targets = HashMap::new();
        targets.insert("hetzner".to_string(), TargetConfig::default());
        let deploy = DeployConfig {
            default_target: Some("hetzner".to_string()),
            targets,
        };

        assert!(deploy.target(None).is_some());
        assert!(deploy.target(Some("hetzner")).is_some());
        assert!(deploy.target(Some("missing")).is_none());
    }

    #[test]
    fn test_base_domain_absent_map() {
        let target = TargetConfig::default();
        assert_eq!(target.base_domain("production"), None);

        let mut domains = HashMap::new();
        domains.insert("development".to_string(), "dev.myapp.com".to_string());
        let target = TargetConfig {
            domains: Some(domains),
            ..Default::default()
        };
        assert_eq!(target.base_domain("development"), Some("dev.myapp.com"));
        assert_eq!(target.base_domain("production"), None);
    }
}
