//! 好友关系实体定义
//!
//! 好友关系在语义上是无序对，物理上按（发起方, 接收方）有序存储，
//! 查询时双向匹配。数据库对有序对建唯一约束，兜底并发重复插入。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::FriendshipStatus;

/// 好友关系
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub id: Uuid,
    /// 请求发起方
    pub requester_id: Uuid,
    /// 请求接收方
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// 返回关系中另一方的用户 ID
    ///
    /// user_id 是 requester 则返回 addressee，反之亦然
    pub fn counterpart_of(&self, user_id: Uuid) -> Uuid {
        if self.requester_id == user_id {
            self.addressee_id
        } else {
            self.requester_id
        }
    }

    /// 判断用户是否参与此关系
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.requester_id == user_id || self.addressee_id == user_id
    }
}
