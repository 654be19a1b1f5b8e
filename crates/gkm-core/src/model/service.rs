//! バッキングサービス設定

use serde::{Deserialize, Serialize};

/// ワークスペースが要求するバッキングサービス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub postgres: Option<ServiceRequest>,
    #[serde(default)]
    pub redis: Option<ServiceRequest>,
    #[serde(default)]
    pub rabbitmq: Option<ServiceRequest>,
}

impl ServicesConfig {
    /// 要求されているサービス種別を固定順（postgres, redis, rabbitmq）で返す
    pub fn requested(&self) -> Vec<ServiceKind> {
        let mut kinds = Vec::new();
        if self.postgres.is_some() {
            kinds.push(ServiceKind::Postgres);
        }
        if self.redis.is_some() {
            kinds.push(ServiceKind::Redis);
        }
        if self.rabbitmq.is_some() {
            kinds.push(ServiceKind::Rabbitmq);
        }
        kinds
    }
}

/// サービス要求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// イメージバージョン（省略時はターゲット側のデフォルト）
    #[serde(default)]
    pub version: Option<String>,
}

/// サービス種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Postgres,
    Redis,
    Rabbitmq,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Postgres => "postgres",
            ServiceKind::Redis => "redis",
            ServiceKind::Rabbitmq => "rabbitmq",
        }
    }

    /// サービスの標準ポート
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceKind::Postgres => 5432,
            ServiceKind::Redis => 6379,
            ServiceKind::Rabbitmq => 5672,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
