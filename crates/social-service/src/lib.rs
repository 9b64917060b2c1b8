//! 社交服务
//!
//! 健身社交后端的事务性工作流层：用户记录跑步、互加好友、
//! 向好友发起「超越我这次跑步」的挑战。
//!
//! ## 核心功能
//!
//! - **好友关系**：请求 / 接受 / 拒绝（取消）状态机，对称唯一
//! - **挑战**：基于本人跑步记录创建，仅对好友可见可应战
//! - **挑战尝试**：用本人跑步记录应战并记录结果
//! - **跑步记录**：创建 / 查询 / 更新，创建时同事务评估成就
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 按实体参数化的数据访问层
//! - `uow`: 工作单元（事务范围）
//! - `service`: 业务工作流层
//! - `achievement`: 成就评估协作方接口
//! - `auth`: 身份解析（Token 验证 + 用户加载）
//! - `handlers` / `routes` / `state`: REST API 装配

pub mod achievement;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod uow;

pub use achievement::{AchievementEngine, NoopAchievementEngine};
pub use auth::{Claims, CurrentUser, JwtConfig, JwtManager};
pub use error::{Result, SocialError};
pub use models::*;
pub use repository::{Page, PageRequest, Repository};
pub use service::{dto, ChallengeService, FriendshipService, RunService};
pub use state::AppState;
pub use uow::UnitOfWork;
