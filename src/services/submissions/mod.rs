pub mod create;
pub mod delete;
pub mod list;

use std::sync::Arc;

use crate::errors::{HWSystemError, Result};
use crate::files::FileStore;
use crate::models::submissions::entities::{Submission, SubmissionKind};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::users::entities::User;
use crate::services::ThesisService;
use crate::storage::Storage;

/// 提交流程
#[derive(Clone)]
pub struct SubmissionService {
    theses: ThesisService,
}

impl SubmissionService {
    pub fn new(theses: ThesisService) -> Self {
        Self { theses }
    }

    pub(crate) fn theses(&self) -> &ThesisService {
        &self.theses
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        self.theses.storage()
    }

    pub(crate) fn files(&self) -> &Arc<dyn FileStore> {
        self.theses.files()
    }

    /// 按 ID 查找提交，不存在时返回 NotFound
    pub(crate) async fn find_submission(&self, submission_id: i64) -> Result<Submission> {
        self.storage()
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| HWSystemError::not_found(format!("提交 {submission_id} 不存在")))
    }

    // 创建提交
    pub async fn create_submission(
        &self,
        thesis_id: i64,
        req: CreateSubmissionRequest,
        actor: &User,
    ) -> Result<Submission> {
        create::create_submission(self, thesis_id, req, actor).await
    }

    // 列出课题的提交
    pub async fn list_by_thesis(&self, thesis_id: i64, requester: &User) -> Result<Vec<Submission>> {
        list::list_by_thesis(self, thesis_id, requester).await
    }

    // 课题最新的一次提交
    pub async fn latest_by_thesis(&self, thesis_id: i64) -> Result<Option<Submission>> {
        list::latest_by_thesis(self, thesis_id).await
    }

    // 按类型列出课题的提交
    pub async fn list_by_thesis_and_kind(
        &self,
        thesis_id: i64,
        kind: SubmissionKind,
    ) -> Result<Vec<Submission>> {
        list::list_by_thesis_and_kind(self, thesis_id, kind).await
    }

    // 查看单个提交
    pub async fn get_submission(&self, submission_id: i64, requester: &User) -> Result<Submission> {
        list::get_submission(self, submission_id, requester).await
    }

    // 删除提交
    pub async fn delete_submission(&self, submission_id: i64, actor: &User) -> Result<()> {
        delete::delete_submission(self, submission_id, actor).await
    }
}
