//! 本地调试用 Token 签发工具
//!
//! ```bash
//! cargo run --example gen_token -- <user_id>
//! ```
//!
//! 密钥取 STRIDE_JWT_SECRET，未设置时使用开发默认值，
//! 需与服务端验证配置一致。

use stride_social::auth::{JwtConfig, JwtManager};
use uuid::Uuid;

fn main() {
    let user_id = std::env::args()
        .nth(1)
        .expect("usage: gen_token <user_id>")
        .parse::<Uuid>()
        .expect("user_id must be a UUID");

    let mut config = JwtConfig::default();
    if let Ok(secret) = std::env::var("STRIDE_JWT_SECRET") {
        config.secret = secret;
    }

    let manager = JwtManager::new(config);
    let (token, expires_at) = manager.generate_token(user_id).expect("token generation failed");

    println!("token: {}", token);
    println!("expires_at: {}", expires_at);
}
