//! 挑战工作流集成测试
//!
//! 使用真实 PostgreSQL 验证挑战创建、可见性、应战与所有权校验。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test challenge_flow_test -- --ignored
//! ```

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::name::en::Name;
use sqlx::PgPool;
use uuid::Uuid;

use stride_social::error::SocialError;
use stride_social::models::{FriendRequestAction, User};
use stride_social::repository::PageRequest;
use stride_social::service::dto::{ChallengeAttemptCreate, ChallengeCreate};
use stride_social::service::{ChallengeService, FriendshipService};
use stride_social::uow::UnitOfWork;

// ==================== 辅助函数 ====================

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

async fn setup_pool() -> PgPool {
    let pool = PgPool::connect(&database_url())
        .await
        .expect("连接测试数据库失败");
    sqlx::migrate!().run(&pool).await.expect("执行迁移失败");
    pool
}

async fn seed_user(pool: &PgPool) -> User {
    let email = format!("user-{}@test.stride.dev", Uuid::new_v4());
    let username: String = Name().fake();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, username)
        VALUES ($1, $2)
        RETURNING id, email, username, age, gender, height, weight, created_at, updated_at
        "#,
    )
    .bind(&email)
    .bind(&username)
    .fetch_one(pool)
    .await
    .expect("插入测试用户失败")
}

/// 插入一条跑步记录，返回记录 ID
async fn seed_run(pool: &PgPool, owner_id: Uuid) -> Uuid {
    let start = Utc::now() - Duration::hours(1);
    let end = Utc::now();

    sqlx::query_scalar(
        r#"
        INSERT INTO runs (owner_id, start_time, end_time, distance_meters, duration_seconds)
        VALUES ($1, $2, $3, 5000.0, 1500)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
    .expect("插入跑步记录失败")
}

/// 通过工作流把两个用户变成好友
async fn make_friends(pool: &PgPool, a: &User, b: &User) {
    let service = FriendshipService;

    let mut uow = UnitOfWork::begin(pool).await.unwrap();
    let request = service.send_request(&mut uow, a, &b.email).await.unwrap();
    uow.commit().await.unwrap();

    let mut uow = UnitOfWork::begin(pool).await.unwrap();
    service
        .respond_to_request(&mut uow, b.id, request.id, FriendRequestAction::Accept)
        .await
        .unwrap();
    uow.commit().await.unwrap();
}

/// 创建挑战并提交事务，返回挑战 ID
async fn create_challenge(pool: &PgPool, creator: &User, source_run_id: Uuid, name: &str) -> Uuid {
    let service = ChallengeService::default();
    let mut uow = UnitOfWork::begin(pool).await.unwrap();
    let resp = service
        .create_challenge(
            &mut uow,
            creator,
            ChallengeCreate {
                name: name.to_string(),
                description: None,
                source_run_id,
            },
        )
        .await
        .expect("创建挑战失败");
    uow.commit().await.unwrap();
    resp.id
}

// ==================== 测试用例 ====================

/// 创建后按基准记录回查得到同一挑战，投影附带创建者与基准记录
#[tokio::test]
#[ignore]
async fn test_create_and_get_by_run_round_trip() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;
    let run_id = seed_run(&pool, x.id).await;

    let challenge_id = create_challenge(&pool, &x, run_id, "5km round trip").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let found = service
        .get_challenge_by_run(&mut uow, run_id)
        .await
        .unwrap()
        .expect("按基准记录应命中挑战");
    uow.commit().await.unwrap();

    assert_eq!(found.id, challenge_id);
    assert!(found.is_active);
    assert_eq!(found.creator.as_ref().unwrap().id, x.id);
    assert_eq!(found.source_run.as_ref().unwrap().id, run_id);

    // 未被任何挑战引用的记录返回 None 而非错误
    let other_run = seed_run(&pool, x.id).await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let none = service.get_challenge_by_run(&mut uow, other_run).await.unwrap();
    uow.commit().await.unwrap();
    assert!(none.is_none());
}

/// 用他人的跑步记录创建挑战被拒绝，且不产生行
#[tokio::test]
#[ignore]
async fn test_create_from_foreign_run_fails_forbidden() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;
    let w = seed_user(&pool).await;
    let foreign_run = seed_run(&pool, w.id).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let result = service
        .create_challenge(
            &mut uow,
            &x,
            ChallengeCreate {
                name: "偷用别人的记录".to_string(),
                description: None,
                source_run_id: foreign_run,
            },
        )
        .await;
    uow.rollback().await;

    assert!(matches!(result, Err(SocialError::Forbidden(_))));

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM challenges WHERE source_run_id = $1")
            .bind(foreign_run)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

/// 基准记录不存在返回 NotFound
#[tokio::test]
#[ignore]
async fn test_create_with_missing_run_fails_not_found() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let result = service
        .create_challenge(
            &mut uow,
            &x,
            ChallengeCreate {
                name: "无中生有".to_string(),
                description: None,
                source_run_id: Uuid::new_v4(),
            },
        )
        .await;
    uow.rollback().await;

    assert!(matches!(result, Err(SocialError::RunNotFound(_))));
}

/// 挑战可见性随好友关系变化；分页不变量成立
#[tokio::test]
#[ignore]
async fn test_visibility_follows_friendship() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;
    let z = seed_user(&pool).await;
    let run_id = seed_run(&pool, x.id).await;
    let challenge_id = create_challenge(&pool, &x, run_id, "好友可见").await;

    // 无好友：空页短路，total=0, total_pages=0
    let page = PageRequest::new(1, 10);
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let before = service
        .list_available_challenges(&mut uow, z.id, page)
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert!(before.items.is_empty());
    assert_eq!(before.total, 0);
    assert_eq!(before.total_pages, 0);

    // 成为好友后恰好可见一条
    make_friends(&pool, &x, &z).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let after = service
        .list_available_challenges(&mut uow, z.id, page)
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert_eq!(after.total, 1);
    assert_eq!(after.total_pages, 1);
    let visible: Vec<Uuid> = after.items.iter().map(|c| c.id).collect();
    assert_eq!(visible, vec![challenge_id]);
    assert!(after.items.len() <= page.limit() as usize);
    // 投影附带创建者
    assert_eq!(after.items[0].creator.as_ref().unwrap().id, x.id);

    // limit=1 时 items 不超过 1
    let small_page = PageRequest::new(1, 1);
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let limited = service
        .list_available_challenges(&mut uow, z.id, small_page)
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert!(limited.items.len() <= 1);
}

/// 用他人的跑步记录应战被拒绝，且不产生尝试行
#[tokio::test]
#[ignore]
async fn test_attempt_with_foreign_run_fails_forbidden() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;
    let z = seed_user(&pool).await;
    let w = seed_user(&pool).await;

    let source_run = seed_run(&pool, x.id).await;
    let challenge_id = create_challenge(&pool, &x, source_run, "所有权校验").await;
    let foreign_run = seed_run(&pool, w.id).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let result = service
        .attempt_challenge(
            &mut uow,
            z.id,
            challenge_id,
            ChallengeAttemptCreate {
                run_id: foreign_run,
                success: true,
            },
        )
        .await;
    uow.rollback().await;

    assert!(matches!(result, Err(SocialError::Forbidden(_))));

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM challenge_attempts WHERE challenge_id = $1")
            .bind(challenge_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

/// 挑战不存在时应战返回 NotFound
#[tokio::test]
#[ignore]
async fn test_attempt_missing_challenge_fails_not_found() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let z = seed_user(&pool).await;
    let run_id = seed_run(&pool, z.id).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let result = service
        .attempt_challenge(
            &mut uow,
            z.id,
            Uuid::new_v4(),
            ChallengeAttemptCreate {
                run_id,
                success: false,
            },
        )
        .await;
    uow.rollback().await;

    assert!(matches!(result, Err(SocialError::ChallengeNotFound(_))));
}

/// 应战成功记录 success 原值；尝试列表最新在前并附带投影
#[tokio::test]
#[ignore]
async fn test_attempt_and_list_attempts() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;
    let z = seed_user(&pool).await;

    let source_run = seed_run(&pool, x.id).await;
    let challenge_id = create_challenge(&pool, &x, source_run, "多次应战").await;

    // 第一次失败，第二次成功
    let first_run = seed_run(&pool, z.id).await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let first = service
        .attempt_challenge(
            &mut uow,
            z.id,
            challenge_id,
            ChallengeAttemptCreate {
                run_id: first_run,
                success: false,
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let second_run = seed_run(&pool, z.id).await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let second = service
        .attempt_challenge(
            &mut uow,
            z.id,
            challenge_id,
            ChallengeAttemptCreate {
                run_id: second_run,
                success: true,
            },
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert!(!first.success);
    assert!(second.success);
    assert_eq!(first.user.as_ref().unwrap().id, z.id);
    assert_eq!(first.run.as_ref().unwrap().id, first_run);

    // 列表最新在前
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let attempts = service
        .get_challenge_attempts(&mut uow, challenge_id)
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].id, second.id);
    assert_eq!(attempts[1].id, first.id);

    // 不存在的挑战查询尝试列表返回 NotFound
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let missing = service
        .get_challenge_attempts(&mut uow, Uuid::new_v4())
        .await;
    uow.rollback().await;
    assert!(matches!(missing, Err(SocialError::ChallengeNotFound(_))));
}

/// 挑战详情：存在则附带投影，不存在返回 NotFound
#[tokio::test]
#[ignore]
async fn test_get_challenge_detail() {
    let pool = setup_pool().await;
    let service = ChallengeService::default();
    let x = seed_user(&pool).await;
    let run_id = seed_run(&pool, x.id).await;
    let challenge_id = create_challenge(&pool, &x, run_id, "详情查询").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let detail = service.get_challenge(&mut uow, challenge_id).await.unwrap();
    let missing = service.get_challenge(&mut uow, Uuid::new_v4()).await;
    uow.commit().await.unwrap();

    assert_eq!(detail.id, challenge_id);
    assert_eq!(detail.creator.as_ref().unwrap().id, x.id);
    assert_eq!(detail.source_run.as_ref().unwrap().id, run_id);
    assert!(matches!(missing, Err(SocialError::ChallengeNotFound(_))));
}
