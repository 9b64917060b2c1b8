//! 数据传输对象定义
//!
//! 请求体带 validator 校验规则；响应体通过显式的 project 构造函数
//! 把已知的关联实体作为参数传入，不依赖任何惰性加载。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Challenge, ChallengeAttempt, Friendship, FriendRequestAction, FriendshipStatus, Run, User};

// ==================== 请求 ====================

/// 发起好友请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestCreate {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
}

/// 响应好友请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestRespond {
    pub action: FriendRequestAction,
}

/// 创建挑战
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeCreate {
    #[validate(length(min = 1, max = 255, message = "挑战名称长度必须在1-255个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    pub source_run_id: Uuid,
}

/// 提交挑战尝试
///
/// success 由调用方给出，本服务原样记录
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeAttemptCreate {
    pub run_id: Uuid,
    pub success: bool,
}

/// 创建跑步记录
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunCreateRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(range(min = 0.0, message = "距离不能为负"))]
    pub distance_meters: f64,
    #[validate(range(min = 0, message = "用时不能为负"))]
    pub duration_seconds: i32,
}

/// 更新跑步记录（部分字段）
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunUpdateRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "距离不能为负"))]
    pub distance_meters: Option<f64>,
    #[validate(range(min = 0, message = "用时不能为负"))]
    pub duration_seconds: Option<i32>,
}

/// 分页查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

// ==================== 响应 ====================

/// 用户信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            age: user.age,
            gender: user.gender,
            height: user.height,
            weight: user.weight,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 跑步记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub distance_meters: f64,
    pub duration_seconds: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Run> for RunResponse {
    fn from(run: Run) -> Self {
        Self {
            id: run.id,
            owner_id: run.owner_id,
            start_time: run.start_time,
            end_time: run.end_time,
            distance_meters: run.distance_meters,
            duration_seconds: run.duration_seconds,
            created_at: run.created_at,
            updated_at: run.updated_at,
        }
    }
}

/// 跑步记录列表
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunListResponse {
    pub runs: Vec<RunResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

/// 好友关系
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addressee: Option<UserResponse>,
}

impl FriendshipResponse {
    /// 投影：关联用户由调用方显式传入，缺失方序列化时省略
    pub fn project(
        friendship: Friendship,
        requester: Option<User>,
        addressee: Option<User>,
    ) -> Self {
        Self {
            id: friendship.id,
            requester_id: friendship.requester_id,
            addressee_id: friendship.addressee_id,
            status: friendship.status,
            created_at: friendship.created_at,
            updated_at: friendship.updated_at,
            requester: requester.map(UserResponse::from),
            addressee: addressee.map(UserResponse::from),
        }
    }
}

/// 好友列表
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendListResponse {
    pub friends: Vec<UserResponse>,
    pub total: i64,
}

/// 待处理好友请求列表，按方向分组
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestListResponse {
    pub incoming: Vec<FriendshipResponse>,
    pub outgoing: Vec<FriendshipResponse>,
}

/// 挑战
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub source_run_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_run: Option<RunResponse>,
}

impl ChallengeResponse {
    /// 投影：创建者与基准跑步记录由调用方显式传入
    pub fn project(challenge: Challenge, creator: Option<User>, source_run: Option<Run>) -> Self {
        Self {
            id: challenge.id,
            creator_id: challenge.creator_id,
            source_run_id: challenge.source_run_id,
            name: challenge.name,
            description: challenge.description,
            is_active: challenge.is_active,
            created_at: challenge.created_at,
            updated_at: challenge.updated_at,
            creator: creator.map(UserResponse::from),
            source_run: source_run.map(RunResponse::from),
        }
    }
}

/// 挑战列表（分页）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeListResponse {
    pub items: Vec<ChallengeResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl ChallengeListResponse {
    /// 空列表页：好友集合为空时直接短路，不发查询
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            limit,
            total_pages: 0,
        }
    }
}

/// 挑战尝试
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeAttemptResponse {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub user_id: Uuid,
    pub run_id: Uuid,
    pub success: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunResponse>,
}

impl ChallengeAttemptResponse {
    /// 投影：应战用户与应战记录由调用方显式传入
    pub fn project(attempt: ChallengeAttempt, user: Option<User>, run: Option<Run>) -> Self {
        Self {
            id: attempt.id,
            challenge_id: attempt.challenge_id,
            user_id: attempt.user_id,
            run_id: attempt.run_id,
            success: attempt.success,
            created_at: attempt.created_at,
            user: user.map(UserResponse::from),
            run: run.map(RunResponse::from),
        }
    }
}
