//! 数据库仓储层
//!
//! 提供按实体参数化的通用数据访问接口，封装 SQL 组装细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 每个实体的过滤/排序字段用封闭枚举显式列举，不做反射式字段匹配
//! - 写能力按实体收窄：User 只读，Challenge/Attempt 只插入，
//!   Friendship 和 Run 可插入可更新
//! - 事务控制由 UnitOfWork 负责，仓储实例全部绑定在同一事务连接上

mod challenge;
mod entity;
mod friendship;
mod repo;
mod run;
mod user;

pub use challenge::{AttemptFilter, AttemptOrder, ChallengeFilter, ChallengeOrder, NewChallenge, NewChallengeAttempt};
pub use entity::{Entity, EntityFilter, InsertValues, Insertable, Page, PageRequest, SortOrder, Updatable, UpdateValues};
pub use friendship::{FriendshipFilter, FriendshipOrder, FriendshipPatch, NewFriendship, RequestDirection};
pub use repo::Repository;
pub use run::{NewRun, RunFilter, RunOrder, RunPatch};
pub use user::{UserFilter, UserOrder};
