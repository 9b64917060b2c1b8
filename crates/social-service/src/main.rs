//! 社交服务入口
//!
//! 提供好友关系、挑战、跑步记录的 REST API。

use std::sync::Arc;

use anyhow::Result;
use stride_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use stride_social::achievement::NoopAchievementEngine;
use stride_social::auth::{JwtConfig, JwtManager};
use stride_social::routes;
use stride_social::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 统一加载配置：config/{service_name}.toml + STRIDE_ 环境变量
    let config = AppConfig::load("stride-social-service").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    // 2. 初始化日志
    let obs_config = config
        .observability
        .clone()
        .with_service_name("stride-social-service");
    observability::init(&obs_config)?;

    info!("Starting stride-social-service on {}", config.server_addr());
    info!(environment = %config.environment, "Configuration loaded");

    // 3. 初始化数据库并执行迁移
    let db = Database::connect(&config.database).await?;
    sqlx::migrate!().run(db.pool()).await?;
    info!("Database connection established, migrations applied");

    // 4. JWT 密钥：生产环境必须通过环境变量注入，开发环境允许默认值
    let jwt_secret = std::env::var("STRIDE_JWT_SECRET").unwrap_or_else(|_| {
        if std::env::var("STRIDE_ENV").unwrap_or_default() == "production" {
            panic!("STRIDE_JWT_SECRET must be set in production environment");
        }
        warn!("Using default JWT secret - set STRIDE_JWT_SECRET for production");
        config.auth.jwt_secret.clone()
    });

    let jwt = JwtManager::new(JwtConfig {
        secret: jwt_secret,
        expires_in_secs: config.auth.jwt_expires_in_secs,
        issuer: config.auth.jwt_issuer.clone(),
    });

    // 5. 装配应用状态；成就引擎尚未接入，使用空实现
    let state = AppState::new(db.pool().clone(), jwt, Arc::new(NoopAchievementEngine));

    // 6. CORS：默认允许本地开发来源，生产环境通过 STRIDE_CORS_ORIGINS 指定
    let allowed_origins = std::env::var("STRIDE_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    let cors = if allowed_origins == "*" {
        warn!("STRIDE_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|o| o.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = routes::app_routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // 7. 启动服务，监听退出信号
    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("stride-social-service listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("stride-social-service stopped");
    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
