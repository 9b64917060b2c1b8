//! 服务层
//!
//! 实现各领域的业务工作流，协调仓储与工作单元。
//!
//! ## 模块结构
//!
//! - `dto`: 数据传输对象定义
//! - `friendship_service`: 好友关系状态机
//! - `challenge_service`: 挑战与挑战尝试编排
//! - `run_service`: 跑步记录与成就评估

pub mod dto;
pub mod challenge_service;
pub mod friendship_service;
pub mod run_service;

pub use challenge_service::ChallengeService;
pub use friendship_service::FriendshipService;
pub use run_service::RunService;
