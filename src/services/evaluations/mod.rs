pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use std::sync::Arc;

use crate::errors::{HWSystemError, Result};
use crate::models::evaluations::entities::{Evaluation, is_valid_score};
use crate::models::evaluations::requests::{CreateEvaluationRequest, UpdateEvaluationRequest};
use crate::models::users::entities::User;
use crate::services::ThesisService;
use crate::storage::Storage;

/// 评审引擎
///
/// 每次成功创建评审后都会经由课题生命周期推动课题进入完成或未通过。
#[derive(Clone)]
pub struct EvaluationService {
    theses: ThesisService,
}

impl EvaluationService {
    pub fn new(theses: ThesisService) -> Self {
        Self { theses }
    }

    pub(crate) fn theses(&self) -> &ThesisService {
        &self.theses
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        self.theses.storage()
    }

    pub(crate) async fn find_evaluation(&self, evaluation_id: i64) -> Result<Evaluation> {
        self.storage()
            .get_evaluation_by_id(evaluation_id)
            .await?
            .ok_or_else(|| HWSystemError::not_found(format!("评审 {evaluation_id} 不存在")))
    }

    // 创建评审
    pub async fn create_evaluation(
        &self,
        submission_id: i64,
        req: CreateEvaluationRequest,
        grader: &User,
    ) -> Result<Evaluation> {
        create::create_evaluation(self, submission_id, req, grader).await
    }

    // 修改评审
    pub async fn update_evaluation(
        &self,
        evaluation_id: i64,
        req: UpdateEvaluationRequest,
        actor: &User,
    ) -> Result<Evaluation> {
        update::update_evaluation(self, evaluation_id, req, actor).await
    }

    // 删除评审
    pub async fn delete_evaluation(&self, evaluation_id: i64, actor: &User) -> Result<()> {
        delete::delete_evaluation(self, evaluation_id, actor).await
    }

    // 列出提交的评审
    pub async fn list_by_submission(
        &self,
        submission_id: i64,
        requester: &User,
    ) -> Result<Vec<Evaluation>> {
        list::list_by_submission(self, submission_id, requester).await
    }

    // 列出评审人的评审
    pub async fn list_by_grader(&self, grader_id: i64) -> Result<Vec<Evaluation>> {
        list::list_by_grader(self, grader_id).await
    }

    pub async fn get_evaluation(&self, evaluation_id: i64) -> Result<Evaluation> {
        self.find_evaluation(evaluation_id).await
    }
}

/// 分数必须在 [0, 10]，越界不做截断
pub(crate) fn ensure_valid_score(score: f64) -> Result<()> {
    if is_valid_score(score) {
        Ok(())
    } else {
        Err(HWSystemError::validation(format!(
            "分数 {score} 超出范围，必须在 0 到 10 之间"
        )))
    }
}
