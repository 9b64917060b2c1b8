//! 共享库
//!
//! 包含各服务共用的配置加载、数据库连接和可观测性初始化代码。

pub mod config;
pub mod database;
pub mod error;
pub mod observability;

pub use config::AppConfig;
pub use database::Database;
pub use error::{SharedError, SharedResult};
