//! 好友关系仓储
//!
//! 关系按（发起方, 接收方）有序存储，查询一律双向匹配，
//! 保证 friendship(a, b) 与 friendship(b, a) 解析到同一行。

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::entity::{Entity, EntityFilter, InsertValues, Insertable, SortOrder, Updatable, UpdateValues};
use super::repo::Repository;
use crate::error::Result;
use crate::models::{Friendship, FriendshipStatus};

/// 好友关系过滤条件
#[derive(Debug, Clone)]
pub enum FriendshipFilter {
    Id(Uuid),
    Status(FriendshipStatus),
    Requester(Uuid),
    Addressee(Uuid),
    /// 用户以任一角色参与
    Involves(Uuid),
}

impl EntityFilter for FriendshipFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Id(id) => {
                qb.push("id = ");
                qb.push_bind(*id);
            }
            Self::Status(status) => {
                qb.push("status = ");
                qb.push_bind(*status);
            }
            Self::Requester(user_id) => {
                qb.push("requester_id = ");
                qb.push_bind(*user_id);
            }
            Self::Addressee(user_id) => {
                qb.push("addressee_id = ");
                qb.push_bind(*user_id);
            }
            Self::Involves(user_id) => {
                qb.push("(requester_id = ");
                qb.push_bind(*user_id);
                qb.push(" OR addressee_id = ");
                qb.push_bind(*user_id);
                qb.push(")");
            }
        }
    }
}

/// 好友关系排序方式
#[derive(Debug, Clone, Copy, Default)]
pub enum FriendshipOrder {
    #[default]
    CreatedAtDesc,
}

impl SortOrder for FriendshipOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "created_at DESC",
        }
    }
}

/// 新建好友请求
#[derive(Debug, Clone)]
pub struct NewFriendship {
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
}

impl InsertValues for NewFriendship {
    const COLUMNS: &'static str = "requester_id, addressee_id, status";

    fn push_values(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = qb.separated(", ");
        sep.push_bind(self.requester_id);
        sep.push_bind(self.addressee_id);
        sep.push_bind(self.status);
    }
}

/// 好友关系补丁
///
/// 只有状态可变：PENDING -> ACCEPTED
#[derive(Debug, Clone, Default)]
pub struct FriendshipPatch {
    pub status: Option<FriendshipStatus>,
}

impl UpdateValues for FriendshipPatch {
    fn push_assignments(&self, qb: &mut QueryBuilder<'_, Postgres>) -> bool {
        let mut sep = qb.separated(", ");
        let mut any = false;

        if let Some(status) = self.status {
            sep.push("status = ");
            sep.push_bind_unseparated(status);
            any = true;
        }

        any
    }
}

impl Entity for Friendship {
    const TABLE: &'static str = "friendships";
    const KIND: &'static str = "friendship";
    const COLUMNS: &'static str =
        "id, requester_id, addressee_id, status, created_at, updated_at";

    type Filter = FriendshipFilter;
    type Order = FriendshipOrder;
}

impl Insertable for Friendship {
    type Create = NewFriendship;
}

impl Updatable for Friendship {
    type Patch = FriendshipPatch;
}

/// 待处理请求的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDirection {
    /// 他人发给此用户
    Incoming,
    /// 此用户发出
    Outgoing,
}

impl Repository<'_, Friendship> {
    /// 对称查询：无论哪一方发起，同一对用户最多命中一行
    pub async fn find_pair(&mut self, user_a: Uuid, user_b: Uuid) -> Result<Option<Friendship>> {
        let friendship = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT id, requester_id, addressee_id, status, created_at, updated_at
            FROM friendships
            WHERE (requester_id = $1 AND addressee_id = $2)
               OR (requester_id = $2 AND addressee_id = $1)
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(self.conn())
        .await?;

        Ok(friendship)
    }

    /// 用户参与的所有已接受关系
    pub async fn list_accepted_of(&mut self, user_id: Uuid) -> Result<Vec<Friendship>> {
        self.get_all(
            &[
                FriendshipFilter::Involves(user_id),
                FriendshipFilter::Status(FriendshipStatus::Accepted),
            ],
            FriendshipOrder::CreatedAtDesc,
        )
        .await
    }

    /// 按方向列出用户的待处理请求
    pub async fn list_pending(
        &mut self,
        user_id: Uuid,
        direction: RequestDirection,
    ) -> Result<Vec<Friendship>> {
        let direction_filter = match direction {
            RequestDirection::Incoming => FriendshipFilter::Addressee(user_id),
            RequestDirection::Outgoing => FriendshipFilter::Requester(user_id),
        };

        self.get_all(
            &[
                FriendshipFilter::Status(FriendshipStatus::Pending),
                direction_filter,
            ],
            FriendshipOrder::CreatedAtDesc,
        )
        .await
    }
}
