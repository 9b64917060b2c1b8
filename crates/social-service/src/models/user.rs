//! 用户实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户
///
/// 本服务只读引用用户：注册、资料维护由账号服务负责
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// 邮箱，全局唯一，好友请求用它定位接收方
    pub email: String,
    #[sqlx(default)]
    pub username: Option<String>,
    #[sqlx(default)]
    pub age: Option<i32>,
    #[sqlx(default)]
    pub gender: Option<String>,
    /// 身高（cm）
    #[sqlx(default)]
    pub height: Option<i32>,
    /// 体重（kg）
    #[sqlx(default)]
    pub weight: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
