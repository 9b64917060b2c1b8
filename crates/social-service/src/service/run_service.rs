//! 跑步记录服务
//!
//! 记录的创建与成就评估在同一事务内完成：评估失败时整个操作回滚，
//! 不会出现「记录已存在但成就账目缺失」的中间状态。

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::achievement::AchievementEngine;
use crate::error::{Result, SocialError};
use crate::repository::{NewRun, PageRequest, RunFilter, RunOrder, RunPatch};
use crate::service::dto::{RunCreateRequest, RunListResponse, RunResponse, RunUpdateRequest};
use crate::uow::UnitOfWork;

/// 跑步记录服务
#[derive(Clone)]
pub struct RunService {
    achievements: Arc<dyn AchievementEngine>,
}

impl RunService {
    pub fn new(achievements: Arc<dyn AchievementEngine>) -> Self {
        Self { achievements }
    }

    /// 创建跑步记录并在同一事务内评估成就
    #[instrument(skip_all, fields(owner_id = %owner_id))]
    pub async fn create_run(
        &self,
        uow: &mut UnitOfWork,
        owner_id: Uuid,
        data: RunCreateRequest,
    ) -> Result<RunResponse> {
        let create = NewRun {
            owner_id,
            start_time: data.start_time,
            end_time: data.end_time,
            distance_meters: data.distance_meters,
            duration_seconds: data.duration_seconds,
        };
        let run = uow.runs().create_one(&create).await?;

        // 成就评估失败会让整个工作单元回滚
        self.achievements.check_and_award(uow, owner_id).await?;

        info!(run_id = %run.id, "跑步记录已创建");
        Ok(RunResponse::from(run))
    }

    /// 用户的跑步记录列表，按开始时间倒序分页
    #[instrument(skip_all, fields(owner_id = %owner_id, page = page.page(), limit = page.limit()))]
    pub async fn list_runs(
        &self,
        uow: &mut UnitOfWork,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<RunListResponse> {
        let result = uow
            .runs()
            .get_many(&[RunFilter::Owner(owner_id)], page, RunOrder::StartTimeDesc)
            .await?;

        let total_pages = result.total_pages(page.limit());
        Ok(RunListResponse {
            runs: result.items.into_iter().map(RunResponse::from).collect(),
            total: result.total,
            page: page.page(),
            limit: page.limit(),
            total_pages,
        })
    }

    /// 查询本人的一条跑步记录
    #[instrument(skip_all, fields(owner_id = %owner_id, run_id = %run_id))]
    pub async fn get_run(
        &self,
        uow: &mut UnitOfWork,
        owner_id: Uuid,
        run_id: Uuid,
    ) -> Result<RunResponse> {
        let run = uow
            .runs()
            .get_one(&[RunFilter::Id(run_id), RunFilter::Owner(owner_id)])
            .await?
            .ok_or(SocialError::RunNotFound(run_id))?;

        Ok(RunResponse::from(run))
    }

    /// 部分更新本人的一条跑步记录
    #[instrument(skip_all, fields(owner_id = %owner_id, run_id = %run_id))]
    pub async fn update_run(
        &self,
        uow: &mut UnitOfWork,
        owner_id: Uuid,
        run_id: Uuid,
        data: RunUpdateRequest,
    ) -> Result<RunResponse> {
        // 所有权校验先行，避免更新他人记录
        uow.runs()
            .get_one(&[RunFilter::Id(run_id), RunFilter::Owner(owner_id)])
            .await?
            .ok_or(SocialError::RunNotFound(run_id))?;

        let patch = RunPatch {
            start_time: data.start_time,
            end_time: data.end_time,
            distance_meters: data.distance_meters,
            duration_seconds: data.duration_seconds,
        };
        let updated = uow.runs().update_one(run_id, &patch).await?;

        info!(run_id = %run_id, "跑步记录已更新");
        Ok(RunResponse::from(updated))
    }
}
