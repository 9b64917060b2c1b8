//! 好友关系工作流集成测试
//!
//! 使用真实 PostgreSQL 验证好友状态机的完整流转与各失败分支。
//! 工作流内「检查 + 写入」跨越多条语句，必须在真实事务语义下覆盖。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test friendship_flow_test -- --ignored
//! ```

use fake::Fake;
use fake::faker::name::en::Name;
use sqlx::PgPool;
use uuid::Uuid;

use stride_social::error::SocialError;
use stride_social::models::{FriendRequestAction, FriendshipStatus, User};
use stride_social::service::FriendshipService;
use stride_social::uow::UnitOfWork;

// ==================== 辅助函数 ====================

/// 从环境变量读取数据库 URL，未设置则 panic
fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

/// 连接测试库并确保迁移已执行
async fn setup_pool() -> PgPool {
    let pool = PgPool::connect(&database_url())
        .await
        .expect("连接测试数据库失败");
    sqlx::migrate!().run(&pool).await.expect("执行迁移失败");
    pool
}

/// 插入一个随机测试用户
///
/// 每个测试使用全新用户，避免用例间状态串扰
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

/// 统计一对用户之间的关系行数（双向）
async fn count_pair_rows(pool: &PgPool, a: Uuid, b: Uuid) -> i64 {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM friendships
        WHERE (requester_id = $1 AND addressee_id = $2)
           OR (requester_id = $2 AND addressee_id = $1)
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_one(pool)
    .await
    .expect("统计关系行失败")
}

/// 发送好友请求并提交事务，返回请求行 ID
async fn send_request(pool: &PgPool, requester: &User, addressee_email: &str) -> Uuid {
    let service = FriendshipService;
    let mut uow = UnitOfWork::begin(pool).await.unwrap();
    let resp = service
        .send_request(&mut uow, requester, addressee_email)
        .await
        .expect("发送好友请求失败");
    uow.commit().await.unwrap();
    resp.id
}

/// 响应好友请求并提交事务
async fn respond(
    pool: &PgPool,
    actor_id: Uuid,
    request_id: Uuid,
    action: FriendRequestAction,
) -> Result<(), SocialError> {
    let service = FriendshipService;
    let mut uow = UnitOfWork::begin(pool).await.unwrap();
    let result = service
        .respond_to_request(&mut uow, actor_id, request_id, action)
        .await;
    match result {
        Ok(()) => {
            uow.commit().await.unwrap();
            Ok(())
        }
        Err(e) => {
            uow.rollback().await;
            Err(e)
        }
    }
}

// ==================== 测试用例 ====================

/// 完整流转：请求 -> 待处理列表 -> 接受 -> 双方好友列表互见
#[tokio::test]
#[ignore]
async fn test_send_and_accept_full_flow() {
    let pool = setup_pool().await;
    let service = FriendshipService;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;

    // 待处理列表：Y 的 incoming、X 的 outgoing 各一条
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let y_requests = service.list_requests(&mut uow, y.id).await.unwrap();
    let x_requests = service.list_requests(&mut uow, x.id).await.unwrap();
    uow.commit().await.unwrap();

    assert!(y_requests.incoming.iter().any(|f| f.id == request_id));
    assert!(y_requests.outgoing.is_empty());
    assert!(x_requests.outgoing.iter().any(|f| f.id == request_id));
    let incoming = y_requests
        .incoming
        .iter()
        .find(|f| f.id == request_id)
        .unwrap();
    assert_eq!(incoming.status, FriendshipStatus::Pending);
    // 投影应附带双方用户
    assert_eq!(incoming.requester.as_ref().unwrap().id, x.id);
    assert_eq!(incoming.addressee.as_ref().unwrap().id, y.id);

    // Y 接受
    respond(&pool, y.id, request_id, FriendRequestAction::Accept)
        .await
        .unwrap();

    // 双方好友列表互见
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let x_friends = service.list_friends(&mut uow, x.id).await.unwrap();
    let y_friends = service.list_friends(&mut uow, y.id).await.unwrap();
    uow.commit().await.unwrap();

    assert_eq!(x_friends.total, 1);
    assert_eq!(x_friends.friends[0].id, y.id);
    assert_eq!(y_friends.total, 1);
    assert_eq!(y_friends.friends[0].id, x.id);
}

/// 自我请求被拒绝，且不产生任何行
#[tokio::test]
#[ignore]
async fn test_send_request_to_self_fails() {
    let pool = setup_pool().await;
    let service = FriendshipService;
    let x = seed_user(&pool).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let result = service.send_request(&mut uow, &x, &x.email).await;
    uow.rollback().await;

    assert!(matches!(result, Err(SocialError::BadRequest(_))));
    assert_eq!(count_pair_rows(&pool, x.id, x.id).await, 0);
}

/// 接收方不存在返回 NotFound
#[tokio::test]
#[ignore]
async fn test_send_request_unknown_email_fails() {
    let pool = setup_pool().await;
    let service = FriendshipService;
    let x = seed_user(&pool).await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let result = service
        .send_request(&mut uow, &x, "nobody@test.stride.dev")
        .await;
    uow.rollback().await;

    assert!(matches!(result, Err(SocialError::UserNotFound(_))));
}

/// 已有关系时任一方向的再次请求都被拒绝，且不产生新行
#[tokio::test]
#[ignore]
async fn test_duplicate_request_rejected_in_both_directions() {
    let pool = setup_pool().await;
    let service = FriendshipService;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;

    // 同方向重复
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let same_direction = service.send_request(&mut uow, &x, &y.email).await;
    uow.rollback().await;
    match same_direction {
        Err(SocialError::BadRequest(reason)) => assert!(reason.contains("已发送")),
        other => panic!("期望 BadRequest，实际: {:?}", other.map(|r| r.id)),
    }

    // 反方向
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let reverse_direction = service.send_request(&mut uow, &y, &x.email).await;
    uow.rollback().await;
    match reverse_direction {
        Err(SocialError::BadRequest(reason)) => assert!(reason.contains("对方")),
        other => panic!("期望 BadRequest，实际: {:?}", other.map(|r| r.id)),
    }

    // 接受后任一方向都是「已经是好友」
    respond(&pool, y.id, request_id, FriendRequestAction::Accept)
        .await
        .unwrap();

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let after_accept = service.send_request(&mut uow, &y, &x.email).await;
    uow.rollback().await;
    match after_accept {
        Err(SocialError::BadRequest(reason)) => assert!(reason.contains("好友")),
        other => panic!("期望 BadRequest，实际: {:?}", other.map(|r| r.id)),
    }

    // 自始至终只有一行
    assert_eq!(count_pair_rows(&pool, x.id, y.id).await, 1);
}

/// 非接收方（包括发起方和第三方）不能接受请求，状态保持 PENDING
#[tokio::test]
#[ignore]
async fn test_accept_requires_addressee() {
    let pool = setup_pool().await;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;
    let z = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;

    let by_requester = respond(&pool, x.id, request_id, FriendRequestAction::Accept).await;
    assert!(matches!(by_requester, Err(SocialError::Forbidden(_))));

    let by_third_party = respond(&pool, z.id, request_id, FriendRequestAction::Accept).await;
    assert!(matches!(by_third_party, Err(SocialError::Forbidden(_))));

    let status: String =
        sqlx::query_scalar("SELECT status FROM friendships WHERE id = $1")
            .bind(request_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "PENDING");
}

/// 非 PENDING 状态的请求不能再被响应，状态不变
#[tokio::test]
#[ignore]
async fn test_respond_to_non_pending_fails() {
    let pool = setup_pool().await;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;
    respond(&pool, y.id, request_id, FriendRequestAction::Accept)
        .await
        .unwrap();

    let second_accept = respond(&pool, y.id, request_id, FriendRequestAction::Accept).await;
    assert!(matches!(second_accept, Err(SocialError::BadRequest(_))));

    let status: String =
        sqlx::query_scalar("SELECT status FROM friendships WHERE id = $1")
            .bind(request_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "ACCEPTED");
}

/// 拒绝删除行且允许立即重新发起
#[tokio::test]
#[ignore]
async fn test_decline_deletes_row_and_allows_rerequest() {
    let pool = setup_pool().await;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;
    respond(&pool, y.id, request_id, FriendRequestAction::Decline)
        .await
        .unwrap();

    assert_eq!(count_pair_rows(&pool, x.id, y.id).await, 0);

    // 立即重新发起成功
    let new_request_id = send_request(&pool, &x, &y.email).await;
    assert_ne!(new_request_id, request_id);
    assert_eq!(count_pair_rows(&pool, x.id, y.id).await, 1);
}

/// 发起方可以用 DECLINE 撤回自己的请求
#[tokio::test]
#[ignore]
async fn test_requester_can_cancel_own_request() {
    let pool = setup_pool().await;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;
    respond(&pool, x.id, request_id, FriendRequestAction::Decline)
        .await
        .unwrap();

    assert_eq!(count_pair_rows(&pool, x.id, y.id).await, 0);
}

/// 第三方不能拒绝别人之间的请求
#[tokio::test]
#[ignore]
async fn test_third_party_cannot_decline() {
    let pool = setup_pool().await;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;
    let z = seed_user(&pool).await;

    let request_id = send_request(&pool, &x, &y.email).await;
    let result = respond(&pool, z.id, request_id, FriendRequestAction::Decline).await;

    assert!(matches!(result, Err(SocialError::Forbidden(_))));
    assert_eq!(count_pair_rows(&pool, x.id, y.id).await, 1);
}

/// 工作单元内任何错误使整个事务回滚：已创建的请求不落库
#[tokio::test]
#[ignore]
async fn test_transact_rolls_back_on_error() {
    let pool = setup_pool().await;
    let service = FriendshipService;
    let x = seed_user(&pool).await;
    let y = seed_user(&pool).await;
    let y_email = y.email.clone();

    let result: Result<(), SocialError> = UnitOfWork::transact(&pool, |uow| {
        let x = x.clone();
        Box::pin(async move {
            // 写入成功后抛错，整个工作单元必须回滚
            service.send_request(uow, &x, &y_email).await?;
            Err(SocialError::Internal("模拟后续步骤失败".to_string()))
        })
    })
    .await;

    assert!(matches!(result, Err(SocialError::Internal(_))));
    assert_eq!(count_pair_rows(&pool, x.id, y.id).await, 0);
}
