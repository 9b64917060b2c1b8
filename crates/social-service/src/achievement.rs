//! 成就评估协作方接口
//!
//! 跑步记录创建后在同一事务内调用，评估算法由外部实现提供。
//! 接口收到的是当前工作单元：实现方的全部写入与记录创建共进退。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::uow::UnitOfWork;

/// 成就评估引擎
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementEngine: Send + Sync {
    /// 评估用户成就并记账
    ///
    /// 返回 Err 会使外层工作单元整体回滚
    async fn check_and_award(&self, uow: &mut UnitOfWork, user_id: Uuid) -> Result<()>;
}

/// 空实现：未接入成就系统时的默认装配
pub struct NoopAchievementEngine;

#[async_trait]
impl AchievementEngine for NoopAchievementEngine {
    async fn check_and_award(&self, _uow: &mut UnitOfWork, user_id: Uuid) -> Result<()> {
        tracing::debug!(user_id = %user_id, "成就评估未接入，跳过");
        Ok(())
    }
}
