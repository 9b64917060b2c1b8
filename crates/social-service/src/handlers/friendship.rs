//! 好友关系 API 处理器

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::SocialError;
use crate::handlers::ApiResponse;
use crate::service::dto::{
    FriendListResponse, FriendRequestCreate, FriendRequestListResponse, FriendRequestRespond,
    FriendshipResponse,
};
use crate::service::FriendshipService;
use crate::state::AppState;
use crate::uow::UnitOfWork;

/// 发起好友请求
///
/// POST /api/friendships/request
pub async fn send_friend_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<FriendRequestCreate>,
) -> Result<Json<ApiResponse<FriendshipResponse>>, SocialError> {
    req.validate()?;

    let service = FriendshipService;
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.send_request(uow, &user, &req.email).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 待处理请求列表（按收发方向分组）
///
/// GET /api/friendships/requests
pub async fn list_friend_requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<FriendRequestListResponse>>, SocialError> {
    let service = FriendshipService;
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.list_requests(uow, user.id).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}

/// 响应好友请求（接受 / 拒绝 / 取消）
///
/// POST /api/friendships/{request_id}/respond
pub async fn respond_to_friend_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(req): Json<FriendRequestRespond>,
) -> Result<Json<ApiResponse<()>>, SocialError> {
    let service = FriendshipService;
    UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move {
            service
                .respond_to_request(uow, user.id, request_id, req.action)
                .await
        })
    })
    .await?;

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 好友列表
///
/// GET /api/friendships
pub async fn list_friends(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<FriendListResponse>>, SocialError> {
    let service = FriendshipService;
    let resp = UnitOfWork::transact(&state.pool, |uow| {
        Box::pin(async move { service.list_friends(uow, user.id).await })
    })
    .await?;

    Ok(Json(ApiResponse::success(resp)))
}
