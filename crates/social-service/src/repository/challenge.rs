//! 挑战与挑战尝试仓储

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::entity::{Entity, EntityFilter, InsertValues, Insertable, Page, PageRequest, SortOrder};
use super::repo::Repository;
use crate::error::Result;
use crate::models::{Challenge, ChallengeAttempt};

/// 挑战过滤条件
#[derive(Debug, Clone)]
pub enum ChallengeFilter {
    Id(Uuid),
    Creator(Uuid),
    SourceRun(Uuid),
    Active(bool),
    /// 创建者属于给定集合
    ///
    /// 调用方保证集合非空：空集合应在服务层短路为「空结果」，
    /// 而不是生成 `= ANY('{}')` 查询
    CreatorIn(Vec<Uuid>),
}

impl EntityFilter for ChallengeFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Id(id) => {
                qb.push("id = ");
                qb.push_bind(*id);
            }
            Self::Creator(creator_id) => {
                qb.push("creator_id = ");
                qb.push_bind(*creator_id);
            }
            Self::SourceRun(run_id) => {
                qb.push("source_run_id = ");
                qb.push_bind(*run_id);
            }
            Self::Active(active) => {
                qb.push("is_active = ");
                qb.push_bind(*active);
            }
            Self::CreatorIn(creator_ids) => {
                qb.push("creator_id = ANY(");
                qb.push_bind(creator_ids.clone());
                qb.push(")");
            }
        }
    }
}

/// 挑战排序方式
#[derive(Debug, Clone, Copy, Default)]
pub enum ChallengeOrder {
    #[default]
    CreatedAtDesc,
}

impl SortOrder for ChallengeOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "created_at DESC",
        }
    }
}

/// 新建挑战
#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub creator_id: Uuid,
    pub source_run_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl InsertValues for NewChallenge {
    const COLUMNS: &'static str = "creator_id, source_run_id, name, description, is_active";

    fn push_values(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = qb.separated(", ");
        sep.push_bind(self.creator_id);
        sep.push_bind(self.source_run_id);
        sep.push_bind(self.name.clone());
        sep.push_bind(self.description.clone());
        sep.push_bind(self.is_active);
    }
}

impl Entity for Challenge {
    const TABLE: &'static str = "challenges";
    const KIND: &'static str = "challenge";
    const COLUMNS: &'static str =
        "id, creator_id, source_run_id, name, description, is_active, created_at, updated_at";

    type Filter = ChallengeFilter;
    type Order = ChallengeOrder;
}

impl Insertable for Challenge {
    type Create = NewChallenge;
}

impl Repository<'_, Challenge> {
    /// 指定创建者集合的生效挑战，分页
    pub async fn page_by_creators(
        &mut self,
        creator_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Challenge>> {
        self.get_many(
            &[
                ChallengeFilter::CreatorIn(creator_ids.to_vec()),
                ChallengeFilter::Active(true),
            ],
            page,
            ChallengeOrder::CreatedAtDesc,
        )
        .await
    }

    /// 按基准跑步记录查询挑战
    ///
    /// 未命中返回 None，不视为错误
    pub async fn find_by_source_run(&mut self, run_id: Uuid) -> Result<Option<Challenge>> {
        self.get_one(&[ChallengeFilter::SourceRun(run_id)]).await
    }
}

/// 挑战尝试过滤条件
#[derive(Debug, Clone)]
pub enum AttemptFilter {
    Id(Uuid),
    Challenge(Uuid),
    User(Uuid),
}

impl EntityFilter for AttemptFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Id(id) => {
                qb.push("id = ");
                qb.push_bind(*id);
            }
            Self::Challenge(challenge_id) => {
                qb.push("challenge_id = ");
                qb.push_bind(*challenge_id);
            }
            Self::User(user_id) => {
                qb.push("user_id = ");
                qb.push_bind(*user_id);
            }
        }
    }
}

/// 挑战尝试排序方式
#[derive(Debug, Clone, Copy, Default)]
pub enum AttemptOrder {
    /// 最新的尝试在前
    #[default]
    CreatedAtDesc,
}

impl SortOrder for AttemptOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "created_at DESC",
        }
    }
}

/// 新建挑战尝试
#[derive(Debug, Clone)]
pub struct NewChallengeAttempt {
    pub challenge_id: Uuid,
    pub user_id: Uuid,
    pub run_id: Uuid,
    pub success: bool,
}

impl InsertValues for NewChallengeAttempt {
    const COLUMNS: &'static str = "challenge_id, user_id, run_id, success";

    fn push_values(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = qb.separated(", ");
        sep.push_bind(self.challenge_id);
        sep.push_bind(self.user_id);
        sep.push_bind(self.run_id);
        sep.push_bind(self.success);
    }
}

impl Entity for ChallengeAttempt {
    const TABLE: &'static str = "challenge_attempts";
    const KIND: &'static str = "challenge_attempt";
    const COLUMNS: &'static str =
        "id, challenge_id, user_id, run_id, success, created_at, updated_at";

    type Filter = AttemptFilter;
    type Order = AttemptOrder;
}

impl Insertable for ChallengeAttempt {
    type Create = NewChallengeAttempt;
}

impl Repository<'_, ChallengeAttempt> {
    /// 某挑战的全部尝试，最新在前
    pub async fn list_by_challenge(&mut self, challenge_id: Uuid) -> Result<Vec<ChallengeAttempt>> {
        self.get_all(
            &[AttemptFilter::Challenge(challenge_id)],
            AttemptOrder::CreatedAtDesc,
        )
        .await
    }
}
