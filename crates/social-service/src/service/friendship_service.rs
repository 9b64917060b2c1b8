//! 好友关系服务
//!
//! 实现好友关系状态机：ABSENT -> PENDING -> ACCEPTED，
//! 拒绝/取消直接删除行，回到 ABSENT。
//!
//! ## 并发说明
//!
//! send_request 的「对称检查 + 插入」不是原子的：检查只是快速失败的
//! 体验优化，真正的防重是 (requester_id, addressee_id) 唯一约束。
//! 两个方向相反的并发请求中后提交的一方会触发约束冲突，
//! 服务层把它转换为 BadRequest。

use std::collections::HashMap;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{is_unique_violation, Result, SocialError};
use crate::models::{FriendRequestAction, FriendshipStatus, User};
use crate::repository::{FriendshipPatch, NewFriendship, RequestDirection};
use crate::service::dto::{
    FriendListResponse, FriendRequestListResponse, FriendshipResponse, UserResponse,
};
use crate::uow::UnitOfWork;

/// 好友关系服务
#[derive(Debug, Clone, Copy, Default)]
pub struct FriendshipService;

impl FriendshipService {
    /// 发起好友请求
    ///
    /// 按邮箱定位接收方；自我请求和任何方向上已存在的关系都会被拒绝，
    /// 拒绝原因区分「已是好友」「你已发送过请求」「对方已向你发送请求」
    #[instrument(skip_all, fields(requester_id = %requester.id, email = %email))]
    pub async fn send_request(
        &self,
        uow: &mut UnitOfWork,
        requester: &User,
        email: &str,
    ) -> Result<FriendshipResponse> {
        // 1. 按邮箱定位接收方
        let addressee = uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or_else(|| SocialError::UserNotFound(email.to_string()))?;

        if addressee.id == requester.id {
            return Err(SocialError::BadRequest("不能向自己发送好友请求".to_string()));
        }

        // 2. 对称检查：任一方向已有关系即拒绝
        if let Some(existing) = uow
            .friendships()
            .find_pair(requester.id, addressee.id)
            .await?
        {
            let reason = if existing.status == FriendshipStatus::Accepted {
                "已经是好友"
            } else if existing.requester_id == requester.id {
                "好友请求已发送"
            } else {
                "对方已向你发送好友请求"
            };
            return Err(SocialError::BadRequest(reason.to_string()));
        }

        // 3. 创建待处理请求；唯一约束兜底并发竞态
        let create = NewFriendship {
            requester_id: requester.id,
            addressee_id: addressee.id,
            status: FriendshipStatus::Pending,
        };
        let friendship = match uow.friendships().create_one(&create).await {
            Ok(friendship) => friendship,
            Err(SocialError::Database(e)) if is_unique_violation(&e) => {
                return Err(SocialError::BadRequest("好友关系已存在".to_string()));
            }
            Err(e) => return Err(e),
        };

        info!(friendship_id = %friendship.id, addressee_id = %addressee.id, "好友请求已创建");

        Ok(FriendshipResponse::project(
            friendship,
            Some(requester.clone()),
            Some(addressee),
        ))
    }

    /// 响应好友请求
    ///
    /// ACCEPT 仅接收方可执行；DECLINE 双方都可执行（发起方执行即撤回）。
    /// 只有 PENDING 状态的请求可以被响应。
    #[instrument(skip_all, fields(actor_id = %actor_id, request_id = %request_id, action = ?action))]
    pub async fn respond_to_request(
        &self,
        uow: &mut UnitOfWork,
        actor_id: Uuid,
        request_id: Uuid,
        action: FriendRequestAction,
    ) -> Result<()> {
        let friendship = uow
            .friendships()
            .get_by_id(request_id)
            .await?
            .ok_or(SocialError::FriendRequestNotFound(request_id))?;

        match action {
            FriendRequestAction::Accept => {
                if actor_id != friendship.addressee_id {
                    return Err(SocialError::Forbidden(
                        "只有接收方可以接受该请求".to_string(),
                    ));
                }
            }
            FriendRequestAction::Decline => {
                if actor_id != friendship.addressee_id && actor_id != friendship.requester_id {
                    return Err(SocialError::Forbidden(
                        "你无权拒绝或取消该请求".to_string(),
                    ));
                }
            }
        }

        if friendship.status != FriendshipStatus::Pending {
            return Err(SocialError::BadRequest("请求不在待处理状态".to_string()));
        }

        match action {
            FriendRequestAction::Accept => {
                let patch = FriendshipPatch {
                    status: Some(FriendshipStatus::Accepted),
                };
                uow.friendships().update_one(request_id, &patch).await?;
                info!(friendship_id = %request_id, "好友请求已接受");
            }
            FriendRequestAction::Decline => {
                // 不保留拒绝终态，删除后允许立即重新发起
                uow.friendships().delete_one(request_id).await?;
                info!(friendship_id = %request_id, "好友请求已删除");
            }
        }

        Ok(())
    }

    /// 用户的好友列表
    ///
    /// 对每条已接受关系取对端用户，批量查询后组装
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn list_friends(
        &self,
        uow: &mut UnitOfWork,
        user_id: Uuid,
    ) -> Result<FriendListResponse> {
        let friend_ids = self.friend_ids(uow, user_id).await?;
        let friends = uow.users().list_by_ids(&friend_ids).await?;

        let total = friends.len() as i64;
        Ok(FriendListResponse {
            friends: friends.into_iter().map(UserResponse::from).collect(),
            total,
        })
    }

    /// 用户的待处理请求，按收发方向分组
    ///
    /// 双方用户批量查询后附加到投影，避免逐条取用户
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn list_requests(
        &self,
        uow: &mut UnitOfWork,
        user_id: Uuid,
    ) -> Result<FriendRequestListResponse> {
        let incoming = uow
            .friendships()
            .list_pending(user_id, RequestDirection::Incoming)
            .await?;
        let outgoing = uow
            .friendships()
            .list_pending(user_id, RequestDirection::Outgoing)
            .await?;

        // 批量取双方用户
        let mut user_ids: Vec<Uuid> = Vec::new();
        for f in incoming.iter().chain(outgoing.iter()) {
            user_ids.push(f.requester_id);
            user_ids.push(f.addressee_id);
        }
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<Uuid, User> = uow
            .users()
            .list_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let project = |rows: Vec<crate::models::Friendship>| -> Vec<FriendshipResponse> {
            rows.into_iter()
                .map(|f| {
                    let requester = users.get(&f.requester_id).cloned();
                    let addressee = users.get(&f.addressee_id).cloned();
                    FriendshipResponse::project(f, requester, addressee)
                })
                .collect()
        };

        Ok(FriendRequestListResponse {
            incoming: project(incoming),
            outgoing: project(outgoing),
        })
    }

    /// 好友 ID 集合解析
    ///
    /// 挑战工作流复用此方法确定「可见挑战」的创建者范围
    pub async fn friend_ids(&self, uow: &mut UnitOfWork, user_id: Uuid) -> Result<Vec<Uuid>> {
        let friendships = uow.friendships().list_accepted_of(user_id).await?;
        Ok(friendships
            .iter()
            .map(|f| f.counterpart_of(user_id))
            .collect())
    }
}
