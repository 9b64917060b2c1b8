//! 身份解析
//!
//! 从 Bearer Token 解出用户身份并加载用户记录。
//! 解析失败一律归为 NotAuthenticated，不区分失败原因。

mod jwt;

pub use jwt::{Claims, JwtConfig, JwtManager};

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use uuid::Uuid;

use crate::error::SocialError;
use crate::models::User;
use crate::state::AppState;

/// 已认证的当前用户
///
/// 作为 extractor 使用：验证 Bearer Token 后按 sub 加载用户。
/// 工作流信任这里解析出的身份，不再二次校验。
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = SocialError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(SocialError::NotAuthenticated)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(SocialError::NotAuthenticated)?;

        let claims = state.jwt.verify_token(token)?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| SocialError::NotAuthenticated)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, age, gender, height, weight, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(|_| SocialError::NotAuthenticated)?
        .ok_or(SocialError::NotAuthenticated)?;

        Ok(Self(user))
    }
}
