//! 基础设施错误类型
//!
//! 仅覆盖共享层自身的失败场景（配置加载、数据库连接），
//! 业务错误由各服务自行定义。

use thiserror::Error;

/// 基础设施错误
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),
}

/// 共享层 Result 类型别名
pub type SharedResult<T> = std::result::Result<T, SharedError>;
