//! 服务层测试夹具：内存存储 + 内存文件存储 + 五个固定用户

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::config::Argon2Config;
use crate::errors::{HWSystemError, Result};
use crate::files::testing::InMemoryFileStore;
use crate::models::evaluations::entities::{Evaluation, NewEvaluation};
use crate::models::evaluations::requests::CreateEvaluationRequest;
use crate::models::submissions::entities::{NewSubmission, Submission, SubmissionKind};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::theses::entities::{NewThesis, Thesis, ThesisStatus};
use crate::models::theses::requests::ProposeThesisRequest;
use crate::models::users::entities::{NewUser, User, UserRole, UserUpdate};
use crate::services::{EvaluationService, SubmissionService, ThesisService, UserService};
use crate::storage::{Storage, ThesisFilter};
use crate::storage::memory_storage::MemoryStorage;

pub struct Fixture {
    pub storage: Arc<dyn Storage>,
    pub files: Arc<InMemoryFileStore>,
    pub theses: ThesisService,
    pub student: User,
    pub other_student: User,
    pub advisor: User,
    pub other_advisor: User,
    pub coordinator: User,
}

async fn seed(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> User {
    storage
        .create_user(NewUser {
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase()),
            password_hash: "$argon2id$test".to_string(),
            role,
        })
        .await
        .unwrap()
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new())).await
    }

    pub async fn with_storage(storage: Arc<dyn Storage>) -> Self {
        let files = Arc::new(InMemoryFileStore::new());
        let theses = ThesisService::new(storage.clone(), files.clone());

        Self {
            student: seed(&storage, "Ana", UserRole::Student).await,
            other_student: seed(&storage, "Bruno", UserRole::Student).await,
            advisor: seed(&storage, "Carla", UserRole::Advisor).await,
            other_advisor: seed(&storage, "Diego", UserRole::Advisor).await,
            coordinator: seed(&storage, "Elisa", UserRole::Coordinator).await,
            storage,
            files,
            theses,
        }
    }

    pub fn submissions_service(&self) -> SubmissionService {
        SubmissionService::new(self.theses.clone())
    }

    pub fn evaluations_service(&self) -> EvaluationService {
        EvaluationService::new(self.theses.clone())
    }

    pub fn users_service(&self) -> UserService {
        UserService::new(
            self.storage.clone(),
            Argon2Config {
                memory_cost: 8,
                time_cost: 1,
                parallelism: 1,
            },
        )
    }

    /// 学生向指导教师提出课题（进行中）
    pub async fn propose(&self) -> Thesis {
        self.propose_as(&self.student, self.advisor.id).await
    }

    pub async fn propose_as(&self, author: &User, supervisor_id: i64) -> Thesis {
        self.theses
            .propose_thesis(
                author,
                ProposeThesisRequest {
                    title: "Incremental type checking".to_string(),
                    summary: String::new(),
                    area: "Compilers".to_string(),
                    supervisor_id,
                },
            )
            .await
            .unwrap()
    }

    /// 提出课题并由指导教师改为“已提出”，使其可以接受提交
    pub async fn propose_open(&self) -> Thesis {
        let thesis = self.propose().await;
        self.theses
            .change_status(thesis.id, ThesisStatus::Proposed, &self.advisor)
            .await
            .unwrap()
    }

    /// 作者提交一份材料
    pub async fn submit(&self, thesis: &Thesis, kind: SubmissionKind) -> Submission {
        self.submissions_service()
            .create_submission(thesis.id, upload(kind), &self.student)
            .await
            .unwrap()
    }

    pub fn score(&self, score: f64) -> CreateEvaluationRequest {
        CreateEvaluationRequest {
            score,
            comment: Some("ok".to_string()),
        }
    }
}

pub fn upload(kind: SubmissionKind) -> CreateSubmissionRequest {
    CreateSubmissionRequest {
        kind,
        note: None,
        file_name: "draft.pdf".to_string(),
        file_bytes: b"%PDF-1.7".to_vec(),
    }
}

/// 内存存储包装：开启后所有写课题的操作都失败，其余操作照常转发
#[derive(Default)]
pub struct FlakyThesisStorage {
    inner: MemoryStorage,
    fail_thesis_writes: AtomicBool,
}

impl FlakyThesisStorage {
    pub fn fail_thesis_writes(&self, fail: bool) {
        self.fail_thesis_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_thesis_writes.load(Ordering::SeqCst) {
            return Err(HWSystemError::database_operation("thesis write failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FlakyThesisStorage {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.inner.create_user(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.inner.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.get_user_by_email(email).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.inner.list_users_by_role(role).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.inner.list_users().await
    }

    async fn count_users(&self) -> Result<u64> {
        self.inner.count_users().await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.inner.update_user(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.inner.delete_user(id).await
    }

    async fn create_thesis(&self, thesis: NewThesis) -> Result<Thesis> {
        self.inner.create_thesis(thesis).await
    }

    async fn get_thesis_by_id(&self, id: i64) -> Result<Option<Thesis>> {
        self.inner.get_thesis_by_id(id).await
    }

    async fn update_thesis(&self, thesis: &Thesis) -> Result<Thesis> {
        self.check()?;
        self.inner.update_thesis(thesis).await
    }

    async fn delete_thesis(&self, id: i64) -> Result<bool> {
        self.inner.delete_thesis(id).await
    }

    async fn list_theses(&self, filter: ThesisFilter) -> Result<Vec<Thesis>> {
        self.inner.list_theses(filter).await
    }

    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.inner.create_submission(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.inner.get_submission_by_id(id).await
    }

    async fn list_submissions_by_thesis(
        &self,
        thesis_id: i64,
        kind: Option<SubmissionKind>,
    ) -> Result<Vec<Submission>> {
        self.inner.list_submissions_by_thesis(thesis_id, kind).await
    }

    async fn get_latest_submission(&self, thesis_id: i64) -> Result<Option<Submission>> {
        self.inner.get_latest_submission(thesis_id).await
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        self.inner.delete_submission(id).await
    }

    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.inner.create_evaluation(evaluation).await
    }

    async fn record_evaluation(
        &self,
        evaluation: NewEvaluation,
        thesis: &Thesis,
    ) -> Result<(Evaluation, Thesis)> {
        self.check()?;
        self.inner.record_evaluation(evaluation, thesis).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.inner.get_evaluation_by_id(id).await
    }

    async fn get_evaluation_by_submission_and_grader(
        &self,
        submission_id: i64,
        grader_id: i64,
    ) -> Result<Option<Evaluation>> {
        self.inner
            .get_evaluation_by_submission_and_grader(submission_id, grader_id)
            .await
    }

    async fn list_evaluations_by_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<Evaluation>> {
        self.inner.list_evaluations_by_submission(submission_id).await
    }

    async fn list_evaluations_by_grader(&self, grader_id: i64) -> Result<Vec<Evaluation>> {
        self.inner.list_evaluations_by_grader(grader_id).await
    }

    async fn count_evaluations_by_submission(&self, submission_id: i64) -> Result<u64> {
        self.inner.count_evaluations_by_submission(submission_id).await
    }

    async fn update_evaluation(&self, evaluation: &Evaluation) -> Result<Evaluation> {
        self.inner.update_evaluation(evaluation).await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.inner.delete_evaluation(id).await
    }
}
