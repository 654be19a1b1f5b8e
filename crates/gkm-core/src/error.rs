use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "不明な依存関係: アプリ '{app}' が '{dependency}' に依存していますが、ワークスペースに定義されていません"
    )]
    UnknownDependency { app: String, dependency: String },

    #[error("自己依存は許可されていません: アプリ '{0}'")]
    SelfDependency(String),

    #[error("循環依存が検出されました: {0}")]
    CircularDependency(String),

    #[error("デプロイターゲットが見つかりません: {0}")]
    TargetNotFound(String),

    #[error("無効な設定: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
