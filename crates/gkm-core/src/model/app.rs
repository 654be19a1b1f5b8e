//! アプリケーション定義

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// アプリケーション種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// APIサーバー等のバックエンド
    Backend,
    /// Webフロントエンド
    Frontend,
}

/// ドメイン設定
///
/// 文字列リテラル、またはステージ名→ホスト名のマップ:
///
/// ```json
/// "domain": "login.myapp.com"
/// "domain": { "production": "login.myapp.com", "staging": "login.stg.myapp.com" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainConfig {
    Literal(String),
    PerStage(HashMap<String, String>),
}

impl DomainConfig {
    /// ステージに対応する明示的なホスト名を返す
    ///
    /// リテラルの場合はステージに関わらずそのまま返す。
    /// マップの場合は該当ステージのエントリのみ返す。
    pub fn for_stage(&self, stage: &str) -> Option<&str> {
        match self {
            DomainConfig::Literal(domain) => Some(domain.as_str()),
            DomainConfig::PerStage(map) => map.get(stage).map(String::as_str),
        }
    }
}

/// アプリケーション設定
///
/// 1回のデプロイ実行中は不変。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// アプリケーション種別
    #[serde(rename = "type")]
    pub app_type: AppType,
    /// ワークスペースルートからの相対パス
    pub path: PathBuf,
    /// リッスンポート
    pub port: u16,
    /// 依存するアプリ名（宣言順）
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// 公開ドメイン（省略時はパターンから計算）
    #[serde(default)]
    pub domain: Option<DomainConfig>,
    /// 生成されるAPIクライアントの出力先
    #[serde(default)]
    pub client_output: Option<PathBuf>,
    /// 解決済みデプロイターゲット名
    #[serde(default)]
    pub deploy_target: Option<String>,
}

impl AppConfig {
    pub fn is_frontend(&self) -> bool {
        self.app_type == AppType::Frontend
    }

    pub fn is_backend(&self) -> bool {
        self.app_type == AppType::Backend
    }
}
