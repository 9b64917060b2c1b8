//! 统一可观测性模块
//!
//! 提供日志初始化的统一入口，所有服务通过同一入口配置，
//! 确保一致的日志格式和过滤规则。

pub mod tracing;

pub use self::tracing::init;
