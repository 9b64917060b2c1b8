//! 挑战 API 处理器

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::SocialError;
use crate::handlers::ApiResponse;
use crate::repository::PageRequest;
use crate::service::dto::{
    ChallengeAttemptCreate, ChallengeAttemptResponse, ChallengeCreate, ChallengeListResponse,
    ChallengeResponse, PageQuery,
};
use crate::service::ChallengeService;
use crate::state::AppState;
use crate::uow::UnitOfWork;

/// 创建挑战
///
/// POST /api/challenges
pub async fn create_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChallengeCreate>,
) -> Result<Json<ApiResponse<ChallengeResponse>>, SocialError> {
    req.validate()?;

    let service = ChallengeService::default();
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.create_challenge(uow, &user, req).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 可应战挑战列表（好友创建、仍生效）
///
/// GET /api/challenges?page=&limit=
pub async fn list_challenges(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<ChallengeListResponse>>, SocialError> {
    let page = PageRequest::new(query.page, query.limit);

    let service = ChallengeService::default();
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.list_available_challenges(uow, user.id, page).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 挑战详情
///
/// GET /api/challenges/{challenge_id}
pub async fn get_challenge(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(challenge_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ChallengeResponse>>, SocialError> {
    let service = ChallengeService::default();
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.get_challenge(uow, challenge_id).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 按基准跑步记录查询挑战
///
/// GET /api/challenges/run/{run_id}
///
/// 未命中返回 data 为 null 的成功响应而非 404
pub async fn get_challenge_by_run(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(run_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<ChallengeResponse>>>, SocialError> {
    let service = ChallengeService::default();
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.get_challenge_by_run(uow, run_id).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 提交挑战尝试
///
/// POST /api/challenges/{challenge_id}/attempt
pub async fn attempt_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(challenge_id): Path<Uuid>,
    Json(req): Json<ChallengeAttemptCreate>,
) -> Result<Json<ApiResponse<ChallengeAttemptResponse>>, SocialError> {
    let service = ChallengeService::default();
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.attempt_challenge(uow, user.id, challenge_id, req).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 某挑战的全部尝试，最新在前
///
/// GET /api/challenges/{challenge_id}/attempts
pub async fn get_challenge_attempts(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(challenge_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChallengeAttemptResponse>>>, SocialError> {
    let service = ChallengeService::default();
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.get_challenge_attempts(uow, challenge_id).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}
