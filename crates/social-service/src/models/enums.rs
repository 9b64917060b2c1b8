//! 社交域枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use serde::{Deserialize, Serialize};

/// 好友关系状态
///
/// 关系行只有两个合法状态：等待对方处理、双方已确认。
/// 拒绝/取消不保留终态，直接删除行。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    /// 待处理 - 请求已发出，等待接收方响应
    #[default]
    Pending,
    /// 已接受 - 双方互为好友
    Accepted,
}

/// 好友请求响应动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendRequestAction {
    /// 接受 - 仅接收方可执行
    Accept,
    /// 拒绝/取消 - 接收方拒绝或发起方撤回
    Decline,
}
