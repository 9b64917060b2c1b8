//! 领域模型定义
//!
//! 实体结构与数据库行一一对应，状态字段使用封闭枚举，
//! 非法状态在类型层面不可表示。

mod challenge;
mod enums;
mod friendship;
mod run;
mod user;

pub use challenge::{Challenge, ChallengeAttempt};
pub use enums::{FriendRequestAction, FriendshipStatus};
pub use friendship::Friendship;
pub use run::Run;
pub use user::User;
