//! 用户仓储
//!
//! 用户由账号服务维护，本核心只读：按邮箱定位好友请求接收方、
//! 按 ID 批量取用户做响应投影。

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::entity::{Entity, EntityFilter, SortOrder};
use super::repo::Repository;
use crate::error::Result;
use crate::models::User;

/// 用户过滤条件
#[derive(Debug, Clone)]
pub enum UserFilter {
    Id(Uuid),
    Email(String),
}

impl EntityFilter for UserFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Id(id) => {
                qb.push("id = ");
                qb.push_bind(*id);
            }
            Self::Email(email) => {
                qb.push("email = ");
                qb.push_bind(email.clone());
            }
        }
    }
}

/// 用户排序方式
#[derive(Debug, Clone, Copy, Default)]
pub enum UserOrder {
    #[default]
    CreatedAtDesc,
}

impl SortOrder for UserOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "created_at DESC",
        }
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const KIND: &'static str = "user";
    const COLUMNS: &'static str =
        "id, email, username, age, gender, height, weight, created_at, updated_at";

    type Filter = UserFilter;
    type Order = UserOrder;
}

impl Repository<'_, User> {
    /// 按邮箱查询用户
    pub async fn find_by_email(&mut self, email: &str) -> Result<Option<User>> {
        self.get_one(&[UserFilter::Email(email.to_string())]).await
    }

    /// 按 ID 集合批量查询，避免逐条往返
    pub async fn list_by_ids(&mut self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, age, gender, height, weight, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(self.conn())
        .await?;

        Ok(users)
    }
}
