//! 工作单元
//!
//! 一个 UnitOfWork 对应一个数据库事务：其上取得的所有仓储实例
//! 共享同一事务连接，正常结束时整体提交，任何错误整体回滚。
//! 不支持嵌套：每个逻辑操作恰好使用一个工作单元。

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;

use crate::error::Result;
use crate::models::{Challenge, ChallengeAttempt, Friendship, Run, User};
use crate::repository::Repository;

/// 事务范围的工作单元
///
/// 仓储访问器借用内部事务连接；由于访问是独占借用，
/// 同一时刻只能有一个仓储在工作，这与「工作流内所有仓储调用
/// 顺序执行」的并发模型一致。
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    /// 开启新事务
    pub async fn begin(pool: &PgPool) -> Result<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// 用户仓储（只读实体）
    pub fn users(&mut self) -> Repository<'_, User> {
        Repository::new(&mut *self.tx)
    }

    /// 跑步记录仓储
    pub fn runs(&mut self) -> Repository<'_, Run> {
        Repository::new(&mut *self.tx)
    }

    /// 好友关系仓储
    pub fn friendships(&mut self) -> Repository<'_, Friendship> {
        Repository::new(&mut *self.tx)
    }

    /// 挑战仓储
    pub fn challenges(&mut self) -> Repository<'_, Challenge> {
        Repository::new(&mut *self.tx)
    }

    /// 挑战尝试仓储
    pub fn attempts(&mut self) -> Repository<'_, ChallengeAttempt> {
        Repository::new(&mut *self.tx)
    }

    /// 提交事务
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    /// 回滚事务
    ///
    /// 回滚自身失败只记录日志：原始业务错误优先传播
    pub async fn rollback(self) {
        if let Err(e) = self.tx.rollback().await {
            warn!(error = %e, "事务回滚失败");
        }
    }

    /// 在一个事务范围内执行操作
    ///
    /// 操作返回 Ok 时提交，返回 Err 时回滚并原样传播错误。
    /// future 被取消时工作单元随之析构，sqlx 会在连接归还前回滚
    /// 未提交的事务，因此所有退出路径都能保证释放。
    pub async fn transact<T, F>(pool: &PgPool, op: F) -> Result<T>
    where
        F: for<'u> FnOnce(&'u mut UnitOfWork) -> BoxFuture<'u, Result<T>>,
    {
        let mut uow = UnitOfWork::begin(pool).await?;

        // op 返回的 future 借用 uow，必须先结束再移动 uow 提交/回滚
        let result = op(&mut uow).await;

        match result {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(err) => {
                uow.rollback().await;
                Err(err)
            }
        }
    }
}
