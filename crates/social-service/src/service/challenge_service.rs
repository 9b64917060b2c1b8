//! 挑战服务
//!
//! 编排挑战与挑战尝试的创建和查询。两条所有权不变量都在创建时
//! 一次性校验：挑战必须基于创建者本人的跑步记录，
//! 应战必须使用应战者本人的跑步记录。

use std::collections::HashMap;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Result, SocialError};
use crate::models::{Run, User};
use crate::repository::{NewChallenge, NewChallengeAttempt, PageRequest};
use crate::service::dto::{
    ChallengeAttemptCreate, ChallengeAttemptResponse, ChallengeCreate, ChallengeListResponse,
    ChallengeResponse,
};
use crate::service::friendship_service::FriendshipService;
use crate::uow::UnitOfWork;

/// 挑战服务
#[derive(Debug, Clone, Copy, Default)]
pub struct ChallengeService {
    friendship: FriendshipService,
}

impl ChallengeService {
    /// 创建挑战
    ///
    /// 基准记录必须存在且归属创建者本人；挑战默认生效
    #[instrument(skip_all, fields(creator_id = %creator.id, source_run_id = %data.source_run_id))]
    pub async fn create_challenge(
        &self,
        uow: &mut UnitOfWork,
        creator: &User,
        data: ChallengeCreate,
    ) -> Result<ChallengeResponse> {
        // 1. 基准记录存在性与所有权校验
        let run = uow
            .runs()
            .get_by_id(data.source_run_id)
            .await?
            .ok_or(SocialError::RunNotFound(data.source_run_id))?;

        if !run.is_owned_by(creator.id) {
            return Err(SocialError::Forbidden(
                "只能用本人的跑步记录创建挑战".to_string(),
            ));
        }

        // 2. 创建挑战
        let create = NewChallenge {
            creator_id: creator.id,
            source_run_id: data.source_run_id,
            name: data.name,
            description: data.description,
            is_active: true,
        };
        let challenge = uow.challenges().create_one(&create).await?;

        info!(challenge_id = %challenge.id, "挑战已创建");

        // 3. 用已知实体投影，不回查
        Ok(ChallengeResponse::project(
            challenge,
            Some(creator.clone()),
            Some(run),
        ))
    }

    /// 可应战挑战列表：好友创建的、仍生效的挑战，分页
    ///
    /// 好友集合为空时直接返回空页（total=0, total_pages=0），
    /// 不生成空集合的 ANY 查询
    #[instrument(skip_all, fields(user_id = %user_id, page = page.page(), limit = page.limit()))]
    pub async fn list_available_challenges(
        &self,
        uow: &mut UnitOfWork,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<ChallengeListResponse> {
        let friend_ids = self.friendship.friend_ids(uow, user_id).await?;
        if friend_ids.is_empty() {
            return Ok(ChallengeListResponse::empty(page.page(), page.limit()));
        }

        let result = uow.challenges().page_by_creators(&friend_ids, page).await?;
        let total_pages = result.total_pages(page.limit());

        // 批量取创建者与基准记录做投影
        let creator_ids: Vec<Uuid> = dedup_ids(result.items.iter().map(|c| c.creator_id));
        let run_ids: Vec<Uuid> = dedup_ids(result.items.iter().map(|c| c.source_run_id));

        let creators: HashMap<Uuid, User> = uow
            .users()
            .list_by_ids(&creator_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let runs: HashMap<Uuid, Run> = uow
            .runs()
            .list_by_ids(&run_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let items = result
            .items
            .into_iter()
            .map(|c| {
                let creator = creators.get(&c.creator_id).cloned();
                let run = runs.get(&c.source_run_id).cloned();
                ChallengeResponse::project(c, creator, run)
            })
            .collect();

        Ok(ChallengeListResponse {
            items,
            total: result.total,
            page: page.page(),
            limit: page.limit(),
            total_pages,
        })
    }

    /// 挑战详情，附带创建者与基准记录
    #[instrument(skip_all, fields(challenge_id = %challenge_id))]
    pub async fn get_challenge(
        &self,
        uow: &mut UnitOfWork,
        challenge_id: Uuid,
    ) -> Result<ChallengeResponse> {
        let challenge = uow
            .challenges()
            .get_by_id(challenge_id)
            .await?
            .ok_or(SocialError::ChallengeNotFound(challenge_id))?;

        self.project_with_relations(uow, challenge).await
    }

    /// 按基准跑步记录查询挑战
    ///
    /// 未命中返回 None 而非错误
    #[instrument(skip_all, fields(run_id = %run_id))]
    pub async fn get_challenge_by_run(
        &self,
        uow: &mut UnitOfWork,
        run_id: Uuid,
    ) -> Result<Option<ChallengeResponse>> {
        let Some(challenge) = uow.challenges().find_by_source_run(run_id).await? else {
            return Ok(None);
        };

        Ok(Some(self.project_with_relations(uow, challenge).await?))
    }

    /// 提交挑战尝试
    ///
    /// success 来自调用方，原样记录：本服务不做路线/成绩核验，
    /// 这是显式的信任边界
    #[instrument(skip_all, fields(user_id = %user_id, challenge_id = %challenge_id, run_id = %data.run_id))]
    pub async fn attempt_challenge(
        &self,
        uow: &mut UnitOfWork,
        user_id: Uuid,
        challenge_id: Uuid,
        data: ChallengeAttemptCreate,
    ) -> Result<ChallengeAttemptResponse> {
        // 1. 挑战必须存在
        let challenge = uow
            .challenges()
            .get_by_id(challenge_id)
            .await?
            .ok_or(SocialError::ChallengeNotFound(challenge_id))?;

        // 2. 基准记录防御性校验：级联规则下正常不会缺失
        uow.runs()
            .get_by_id(challenge.source_run_id)
            .await?
            .ok_or(SocialError::RunNotFound(challenge.source_run_id))?;

        // 3. 应战记录存在性与所有权校验
        let attempt_run = uow
            .runs()
            .get_by_id(data.run_id)
            .await?
            .ok_or(SocialError::RunNotFound(data.run_id))?;

        if !attempt_run.is_owned_by(user_id) {
            return Err(SocialError::Forbidden(
                "只能提交本人的跑步记录".to_string(),
            ));
        }

        // 4. 记录尝试
        let create = NewChallengeAttempt {
            challenge_id,
            user_id,
            run_id: data.run_id,
            success: data.success,
        };
        let attempt = uow.attempts().create_one(&create).await?;

        info!(attempt_id = %attempt.id, success = attempt.success, "挑战尝试已记录");

        // 5. 投影附带应战用户与应战记录
        let user = uow.users().get_by_id(user_id).await?;
        Ok(ChallengeAttemptResponse::project(
            attempt,
            user,
            Some(attempt_run),
        ))
    }

    /// 某挑战的全部尝试，最新在前
    #[instrument(skip_all, fields(challenge_id = %challenge_id))]
    pub async fn get_challenge_attempts(
        &self,
        uow: &mut UnitOfWork,
        challenge_id: Uuid,
    ) -> Result<Vec<ChallengeAttemptResponse>> {
        // 挑战必须存在
        uow.challenges()
            .get_by_id(challenge_id)
            .await?
            .ok_or(SocialError::ChallengeNotFound(challenge_id))?;

        let attempts = uow.attempts().list_by_challenge(challenge_id).await?;

        let user_ids: Vec<Uuid> = dedup_ids(attempts.iter().map(|a| a.user_id));
        let run_ids: Vec<Uuid> = dedup_ids(attempts.iter().map(|a| a.run_id));

        let users: HashMap<Uuid, User> = uow
            .users()
            .list_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let runs: HashMap<Uuid, Run> = uow
            .runs()
            .list_by_ids(&run_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        Ok(attempts
            .into_iter()
            .map(|a| {
                let user = users.get(&a.user_id).cloned();
                let run = runs.get(&a.run_id).cloned();
                ChallengeAttemptResponse::project(a, user, run)
            })
            .collect())
    }

    /// 取创建者与基准记录后投影单个挑战
    async fn project_with_relations(
        &self,
        uow: &mut UnitOfWork,
        challenge: crate::models::Challenge,
    ) -> Result<ChallengeResponse> {
        let creator = uow.users().get_by_id(challenge.creator_id).await?;
        let source_run = uow.runs().get_by_id(challenge.source_run_id).await?;
        Ok(ChallengeResponse::project(challenge, creator, source_run))
    }
}

/// 去重后的 ID 集合
fn dedup_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
