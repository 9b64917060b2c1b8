//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// 好友关系路由
fn friendship_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/friendships/request",
            post(handlers::friendship::send_friend_request),
        )
        .route(
            "/friendships/requests",
            get(handlers::friendship::list_friend_requests),
        )
        .route(
            "/friendships/{request_id}/respond",
            post(handlers::friendship::respond_to_friend_request),
        )
        .route("/friendships", get(handlers::friendship::list_friends))
}

/// 挑战路由
fn challenge_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/challenges",
            post(handlers::challenge::create_challenge).get(handlers::challenge::list_challenges),
        )
        .route(
            "/challenges/run/{run_id}",
            get(handlers::challenge::get_challenge_by_run),
        )
        .route(
            "/challenges/{challenge_id}",
            get(handlers::challenge::get_challenge),
        )
        .route(
            "/challenges/{challenge_id}/attempt",
            post(handlers::challenge::attempt_challenge),
        )
        .route(
            "/challenges/{challenge_id}/attempts",
            get(handlers::challenge::get_challenge_attempts),
        )
}

/// 跑步记录路由
fn run_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/runs",
            post(handlers::run::create_run).get(handlers::run::list_runs),
        )
        .route(
            "/runs/{run_id}",
            get(handlers::run::get_run).patch(handlers::run::update_run),
        )
}

/// 组装完整 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(friendship_routes())
        .merge(challenge_routes())
        .merge(run_routes())
}

/// 应用根路由（含健康检查）
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
}
