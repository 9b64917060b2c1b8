//! 跑步记录仓储
//!
//! 跑步记录的创建/更新始终限定在归属用户范围内，
//! 挑战流程通过按 ID 批量查询做响应投影。

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::entity::{Entity, EntityFilter, InsertValues, Insertable, SortOrder, Updatable, UpdateValues};
use super::repo::Repository;
use crate::error::Result;
use crate::models::Run;

/// 跑步记录过滤条件
#[derive(Debug, Clone)]
pub enum RunFilter {
    Id(Uuid),
    Owner(Uuid),
}

impl EntityFilter for RunFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Id(id) => {
                qb.push("id = ");
                qb.push_bind(*id);
            }
            Self::Owner(owner_id) => {
                qb.push("owner_id = ");
                qb.push_bind(*owner_id);
            }
        }
    }
}

/// 跑步记录排序方式
#[derive(Debug, Clone, Copy, Default)]
pub enum RunOrder {
    /// 按开始时间倒序，列表页默认
    #[default]
    StartTimeDesc,
    CreatedAtDesc,
}

impl SortOrder for RunOrder {
    fn sql(&self) -> &'static str {
        match self {
            Self::StartTimeDesc => "start_time DESC",
            Self::CreatedAtDesc => "created_at DESC",
        }
    }
}

/// 新建跑步记录
#[derive(Debug, Clone)]
pub struct NewRun {
    pub owner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub distance_meters: f64,
    pub duration_seconds: i32,
}

impl InsertValues for NewRun {
    const COLUMNS: &'static str = "owner_id, start_time, end_time, distance_meters, duration_seconds";

    fn push_values(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = qb.separated(", ");
        sep.push_bind(self.owner_id);
        sep.push_bind(self.start_time);
        sep.push_bind(self.end_time);
        sep.push_bind(self.distance_meters);
        sep.push_bind(self.duration_seconds);
    }
}

/// 跑步记录补丁，未设置的字段不改动
#[derive(Debug, Clone, Default)]
pub struct RunPatch {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<i32>,
}

impl UpdateValues for RunPatch {
    fn push_assignments(&self, qb: &mut QueryBuilder<'_, Postgres>) -> bool {
        let mut sep = qb.separated(", ");
        let mut any = false;

        if let Some(start_time) = self.start_time {
            sep.push("start_time = ");
            sep.push_bind_unseparated(start_time);
            any = true;
        }
        if let Some(end_time) = self.end_time {
            sep.push("end_time = ");
            sep.push_bind_unseparated(end_time);
            any = true;
        }
        if let Some(distance) = self.distance_meters {
            sep.push("distance_meters = ");
            sep.push_bind_unseparated(distance);
            any = true;
        }
        if let Some(duration) = self.duration_seconds {
            sep.push("duration_seconds = ");
            sep.push_bind_unseparated(duration);
            any = true;
        }

        any
    }
}

impl Entity for Run {
    const TABLE: &'static str = "runs";
    const KIND: &'static str = "run";
    const COLUMNS: &'static str =
        "id, owner_id, start_time, end_time, distance_meters, duration_seconds, created_at, updated_at";

    type Filter = RunFilter;
    type Order = RunOrder;
}

impl Insertable for Run {
    type Create = NewRun;
}

impl Updatable for Run {
    type Patch = RunPatch;
}

impl Repository<'_, Run> {
    /// 按 ID 集合批量查询，避免逐条往返
    pub async fn list_by_ids(&mut self, ids: &[Uuid]) -> Result<Vec<Run>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let runs = sqlx::query_as::<_, Run>(
            r#"
            SELECT id, owner_id, start_time, end_time, distance_meters, duration_seconds,
                   created_at, updated_at
            FROM runs
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(self.conn())
        .await?;

        Ok(runs)
    }
}
