//! 社交服务错误类型
//!
//! 定义业务错误与系统错误的统一分类，以及到 HTTP 响应的映射。
//! 工作流只负责抛出，不做本地恢复；事务范围内任何错误都会整体回滚。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// 社交服务错误类型
#[derive(Debug, Error)]
pub enum SocialError {
    // === 资源不存在 ===
    #[error("用户不存在: {0}")]
    UserNotFound(String),

    #[error("跑步记录不存在: {0}")]
    RunNotFound(Uuid),

    #[error("挑战不存在: {0}")]
    ChallengeNotFound(Uuid),

    #[error("好友请求不存在: {0}")]
    FriendRequestNotFound(Uuid),

    /// 通用仓储层变体，携带实体种类标识
    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: &'static str, id: String },

    // === 权限与业务规则 ===
    #[error("无权操作: {0}")]
    Forbidden(String),

    #[error("请求无效: {0}")]
    BadRequest(String),

    #[error("未认证或凭证无效")]
    NotAuthenticated,

    // === 系统错误 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 社交服务 Result 类型别名
pub type Result<T> = std::result::Result<T, SocialError>;

impl SocialError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound(_)
            | Self::RunNotFound(_)
            | Self::ChallengeNotFound(_)
            | Self::FriendRequestNotFound(_)
            | Self::NotFound { .. } => StatusCode::NOT_FOUND,

            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::RunNotFound(_) => "RUN_NOT_FOUND",
            Self::ChallengeNotFound(_) => "CHALLENGE_NOT_FOUND",
            Self::FriendRequestNotFound(_) => "FRIEND_REQUEST_NOT_FOUND",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for SocialError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 判断数据库错误是否为唯一约束冲突
///
/// 好友关系的「检查后插入」存在竞态窗口，唯一约束是最终仲裁；
/// 服务层据此把冲突转换为 BadRequest 而非 500
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
