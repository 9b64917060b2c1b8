//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use sqlx::PgPool;

use crate::achievement::AchievementEngine;
use crate::auth::JwtManager;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    /// Token 验证器
    pub jwt: JwtManager,
    /// 成就评估协作方
    pub achievements: Arc<dyn AchievementEngine>,
}

impl AppState {
    pub fn new(pool: PgPool, jwt: JwtManager, achievements: Arc<dyn AchievementEngine>) -> Self {
        Self {
            pool,
            jwt,
            achievements,
        }
    }
}
