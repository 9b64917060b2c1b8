//! 跑步记录 API 处理器

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::SocialError;
use crate::handlers::ApiResponse;
use crate::repository::PageRequest;
use crate::service::dto::{PageQuery, RunCreateRequest, RunListResponse, RunResponse, RunUpdateRequest};
use crate::service::RunService;
use crate::state::AppState;
use crate::uow::UnitOfWork;

/// 创建跑步记录
///
/// POST /api/runs
///
/// 记录插入与成就评估在同一事务内完成
pub async fn create_run(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<RunCreateRequest>,
) -> Result<Json<ApiResponse<RunResponse>>, SocialError> {
    req.validate()?;

    let service = RunService::new(state.achievements.clone());
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.create_run(uow, user.id, req).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 本人跑步记录列表
///
/// GET /api/runs?page=&limit=
pub async fn list_runs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<RunListResponse>>, SocialError> {
    let page = PageRequest::new(query.page, query.limit);

    let service = RunService::new(state.achievements.clone());
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.list_runs(uow, user.id, page).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 本人单条跑步记录
///
/// GET /api/runs/{run_id}
pub async fn get_run(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(run_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RunResponse>>, SocialError> {
    let service = RunService::new(state.achievements.clone());
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.get_run(uow, user.id, run_id).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 部分更新本人跑步记录
///
/// PATCH /api/runs/{run_id}
pub async fn update_run(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(run_id): Path<Uuid>,
    Json(req): Json<RunUpdateRequest>,
) -> Result<Json<ApiResponse<RunResponse>>, SocialError> {
    req.validate()?;

    let service = RunService::new(state.achievements.clone());
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.update_run(uow, user.id, run_id, req).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}
