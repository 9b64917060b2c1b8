//! 挑战相关实体定义
//!
//! Challenge 由用户基于自己的一次跑步记录创建；
//! ChallengeAttempt 记录其他用户用自己的跑步记录应战的结果。
//! 删除 Challenge 时数据库级联删除其全部 Attempt。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 挑战
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: Uuid,
    /// 创建者，创建时校验 creator_id == source_run.owner_id
    pub creator_id: Uuid,
    /// 作为挑战基准的跑步记录
    pub source_run_id: Uuid,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 是否对好友可见可应战
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 挑战尝试
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeAttempt {
    pub id: Uuid,
    pub challenge_id: Uuid,
    /// 应战用户，创建时校验 run.owner_id == user_id
    pub user_id: Uuid,
    /// 应战使用的跑步记录
    pub run_id: Uuid,
    /// 是否战胜，由调用方给出，本服务不做路线/成绩核验
    pub success: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
