use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    evaluations::entities::{Evaluation, NewEvaluation},
    submissions::entities::{NewSubmission, Submission, SubmissionKind},
    theses::entities::{NewThesis, Thesis, ThesisStatus},
    users::entities::{NewUser, User, UserRole, UserUpdate},
};

use crate::errors::Result;

pub mod memory_storage;
pub mod sea_orm_storage;

/// 课题列表筛选条件，字段为 None 表示不限
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThesisFilter {
    pub author_id: Option<i64>,
    pub supervisor_id: Option<i64>,
    pub status: Option<ThesisStatus>,
}

impl ThesisFilter {
    pub fn by_author(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..Default::default()
        }
    }

    pub fn by_supervisor(supervisor_id: i64) -> Self {
        Self {
            supervisor_id: Some(supervisor_id),
            ..Default::default()
        }
    }

    pub fn by_status(status: ThesisStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Option<ThesisStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, thesis: &Thesis) -> bool {
        self.author_id.is_none_or(|id| thesis.author_id == id)
            && self.supervisor_id.is_none_or(|id| thesis.supervisor_id == id)
            && self.status.is_none_or(|status| thesis.status == status)
    }
}

/// 持久化协作方
///
/// 每个方法对应一次独立的读写；跨实体的唯一性（邮箱、同一评审人对同一提交）
/// 由具体后端保证。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 按角色列出用户
    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>>;
    // 列出全部用户
    async fn list_users(&self) -> Result<Vec<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 更新用户资料，用户不存在时返回 None
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;

    /// 课题管理方法
    // 创建课题
    async fn create_thesis(&self, thesis: NewThesis) -> Result<Thesis>;
    // 通过ID获取课题
    async fn get_thesis_by_id(&self, id: i64) -> Result<Option<Thesis>>;
    // 保存课题的可变字段（标题、摘要、方向、状态、更新时间）
    async fn update_thesis(&self, thesis: &Thesis) -> Result<Thesis>;
    // 删除课题，级联删除其提交与评审
    async fn delete_thesis(&self, id: i64) -> Result<bool>;
    // 按条件列出课题
    async fn list_theses(&self, filter: ThesisFilter) -> Result<Vec<Thesis>>;

    /// 提交管理方法
    // 创建提交
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 列出课题的提交（按提交时间倒序），可按类型筛选
    async fn list_submissions_by_thesis(
        &self,
        thesis_id: i64,
        kind: Option<SubmissionKind>,
    ) -> Result<Vec<Submission>>;
    // 获取课题最新的一次提交
    async fn get_latest_submission(&self, thesis_id: i64) -> Result<Option<Submission>>;
    // 删除提交，级联删除其评审
    async fn delete_submission(&self, id: i64) -> Result<bool>;

    /// 评审管理方法
    // 创建评审
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation>;
    // 创建评审并写入课题的新状态，两者同时生效或同时失败
    async fn record_evaluation(
        &self,
        evaluation: NewEvaluation,
        thesis: &Thesis,
    ) -> Result<(Evaluation, Thesis)>;
    // 通过ID获取评审
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    // 获取某评审人对某提交的评审
    async fn get_evaluation_by_submission_and_grader(
        &self,
        submission_id: i64,
        grader_id: i64,
    ) -> Result<Option<Evaluation>>;
    // 列出提交的全部评审
    async fn list_evaluations_by_submission(&self, submission_id: i64)
    -> Result<Vec<Evaluation>>;
    // 列出评审人的全部评审
    async fn list_evaluations_by_grader(&self, grader_id: i64) -> Result<Vec<Evaluation>>;
    // 统计提交的评审数量
    async fn count_evaluations_by_submission(&self, submission_id: i64) -> Result<u64>;
    // 保存评审的分数、评语与评审时间
    async fn update_evaluation(&self, evaluation: &Evaluation) -> Result<Evaluation>;
    // 删除评审
    async fn delete_evaluation(&self, id: i64) -> Result<bool>;
}

pub const MEMORY_STORAGE_URL: &str = "memory://";

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let config = AppConfig::get();
    if config.database.url == MEMORY_STORAGE_URL {
        tracing::warn!("Using in-memory storage, data will be lost on shutdown");
        return Ok(Arc::new(memory_storage::MemoryStorage::new()));
    }
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
