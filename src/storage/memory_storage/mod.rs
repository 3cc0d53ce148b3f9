//! 内存存储实现
//!
//! 以 ID 为键的容器保存各类记录，实体之间只通过 ID 互相引用，
//! 级联删除在同一把写锁内完成。主要用于测试与本地演示（`database.url = "memory://"`）。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::{HWSystemError, Result};
use crate::models::{
    evaluations::entities::{Evaluation, NewEvaluation},
    submissions::entities::{NewSubmission, Submission, SubmissionKind},
    theses::entities::{NewThesis, Thesis},
    users::entities::{NewUser, User, UserRole, UserUpdate},
};
use crate::storage::{Storage, ThesisFilter};

/// 单个实体类型的容器，ID 自增
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Arena {
    users: Table<User>,
    theses: Table<Thesis>,
    submissions: Table<Submission>,
    evaluations: Table<Evaluation>,
}

impl Arena {
    fn insert_evaluation(&mut self, evaluation: NewEvaluation) -> Result<Evaluation> {
        if !self.submissions.rows.contains_key(&evaluation.submission_id) {
            return Err(HWSystemError::not_found(format!(
                "Submission {} not found",
                evaluation.submission_id
            )));
        }
        let duplicated = self.evaluations.rows.values().any(|e| {
            e.submission_id == evaluation.submission_id && e.grader_id == evaluation.grader_id
        });
        if duplicated {
            return Err(HWSystemError::conflict(
                "Evaluation for this submission and grader already exists",
            ));
        }
        let id = self.evaluations.allocate_id();
        let record = Evaluation {
            id,
            submission_id: evaluation.submission_id,
            grader_id: evaluation.grader_id,
            score: evaluation.score,
            comment: evaluation.comment,
            evaluated_at: evaluation.evaluated_at,
        };
        self.evaluations.rows.insert(id, record.clone());
        Ok(record)
    }

    fn apply_thesis(&mut self, thesis: &Thesis) -> Result<Thesis> {
        let stored = self
            .theses
            .rows
            .get_mut(&thesis.id)
            .ok_or_else(|| HWSystemError::not_found(format!("Thesis {} not found", thesis.id)))?;
        stored.title = thesis.title.clone();
        stored.summary = thesis.summary.clone();
        stored.area = thesis.area.clone();
        stored.status = thesis.status;
        stored.updated_at = thesis.updated_at;
        Ok(stored.clone())
    }

    fn is_user_referenced(&self, user_id: i64) -> bool {
        self.theses
            .rows
            .values()
            .any(|t| t.author_id == user_id || t.supervisor_id == user_id)
            || self.evaluations.rows.values().any(|e| e.grader_id == user_id)
    }

    fn remove_submission_cascade(&mut self, submission_id: i64) -> bool {
        if self.submissions.rows.remove(&submission_id).is_none() {
            return false;
        }
        self.evaluations
            .rows
            .retain(|_, e| e.submission_id != submission_id);
        true
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    arena: RwLock<Arena>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 按提交时间倒序，时间相同时后写入的在前
fn sort_latest_first(submissions: &mut [Submission]) {
    submissions.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
}

fn sort_evaluations_latest_first(evaluations: &mut [Evaluation]) {
    evaluations.sort_by(|a, b| {
        b.evaluated_at
            .cmp(&a.evaluated_at)
            .then(b.id.cmp(&a.id))
    });
}

#[async_trait]
impl Storage for MemoryStorage {
    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut arena = self.arena.write().await;
        if arena.users.rows.values().any(|u| u.email == user.email) {
            return Err(HWSystemError::conflict(format!(
                "Email already registered: {}",
                user.email
            )));
        }
        let id = arena.users.allocate_id();
        let record = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: chrono::Utc::now(),
        };
        arena.users.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.arena.read().await.users.rows.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let arena = self.arena.read().await;
        Ok(arena.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        let arena = self.arena.read().await;
        Ok(arena
            .users
            .rows
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.arena.read().await.users.rows.values().cloned().collect())
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.arena.read().await.users.rows.len() as u64)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let mut arena = self.arena.write().await;
        let Some(stored) = arena.users.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            stored.name = name;
        }
        if let Some(password_hash) = update.password_hash {
            stored.password_hash = password_hash;
        }
        Ok(Some(stored.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let mut arena = self.arena.write().await;
        // 与外键 RESTRICT 一致：仍被课题或评审引用的用户不能删除
        if arena.is_user_referenced(id) {
            return Err(HWSystemError::conflict(format!(
                "User {id} is still referenced by theses or evaluations"
            )));
        }
        Ok(arena.users.rows.remove(&id).is_some())
    }

    // 课题模块
    async fn create_thesis(&self, thesis: NewThesis) -> Result<Thesis> {
        let mut arena = self.arena.write().await;
        let id = arena.theses.allocate_id();
        let record = Thesis {
            id,
            title: thesis.title,
            summary: thesis.summary,
            area: thesis.area,
            status: thesis.status,
            author_id: thesis.author_id,
            supervisor_id: thesis.supervisor_id,
            created_at: thesis.created_at,
            updated_at: None,
        };
        arena.theses.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_thesis_by_id(&self, id: i64) -> Result<Option<Thesis>> {
        Ok(self.arena.read().await.theses.rows.get(&id).cloned())
    }

    async fn update_thesis(&self, thesis: &Thesis) -> Result<Thesis> {
        self.arena.write().await.apply_thesis(thesis)
    }

    async fn delete_thesis(&self, id: i64) -> Result<bool> {
        let mut arena = self.arena.write().await;
        if arena.theses.rows.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<i64> = arena
            .submissions
            .rows
            .values()
            .filter(|s| s.thesis_id == id)
            .map(|s| s.id)
            .collect();
        for submission_id in owned {
            arena.remove_submission_cascade(submission_id);
        }
        Ok(true)
    }

    async fn list_theses(&self, filter: ThesisFilter) -> Result<Vec<Thesis>> {
        let arena = self.arena.read().await;
        Ok(arena
            .theses
            .rows
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        let mut arena = self.arena.write().await;
        if !arena.theses.rows.contains_key(&submission.thesis_id) {
            return Err(HWSystemError::not_found(format!(
                "Thesis {} not found",
                submission.thesis_id
            )));
        }
        let id = arena.submissions.allocate_id();
        let record = Submission {
            id,
            thesis_id: submission.thesis_id,
            kind: submission.kind,
            note: submission.note,
            file_ref: submission.file_ref,
            sent_at: submission.sent_at,
        };
        arena.submissions.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        Ok(self.arena.read().await.submissions.rows.get(&id).cloned())
    }

    async fn list_submissions_by_thesis(
        &self,
        thesis_id: i64,
        kind: Option<SubmissionKind>,
    ) -> Result<Vec<Submission>> {
        let arena = self.arena.read().await;
        let mut items: Vec<Submission> = arena
            .submissions
            .rows
            .values()
            .filter(|s| s.thesis_id == thesis_id && kind.is_none_or(|k| s.kind == k))
            .cloned()
            .collect();
        sort_latest_first(&mut items);
        Ok(items)
    }

    async fn get_latest_submission(&self, thesis_id: i64) -> Result<Option<Submission>> {
        Ok(self
            .list_submissions_by_thesis(thesis_id, None)
            .await?
            .into_iter()
            .next())
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        Ok(self.arena.write().await.remove_submission_cascade(id))
    }

    // 评审模块
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.arena.write().await.insert_evaluation(evaluation)
    }

    async fn record_evaluation(
        &self,
        evaluation: NewEvaluation,
        thesis: &Thesis,
    ) -> Result<(Evaluation, Thesis)> {
        let mut arena = self.arena.write().await;
        // 先确认课题存在，插入评审后的状态写入不会再失败
        if !arena.theses.rows.contains_key(&thesis.id) {
            return Err(HWSystemError::not_found(format!("Thesis {} not found", thesis.id)));
        }
        let record = arena.insert_evaluation(evaluation)?;
        let thesis = arena.apply_thesis(thesis)?;
        Ok((record, thesis))
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        Ok(self.arena.read().await.evaluations.rows.get(&id).cloned())
    }

    async fn get_evaluation_by_submission_and_grader(
        &self,
        submission_id: i64,
        grader_id: i64,
    ) -> Result<Option<Evaluation>> {
        let arena = self.arena.read().await;
        Ok(arena
            .evaluations
            .rows
            .values()
            .find(|e| e.submission_id == submission_id && e.grader_id == grader_id)
            .cloned())
    }

    async fn list_evaluations_by_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<Evaluation>> {
        let arena = self.arena.read().await;
        let mut items: Vec<Evaluation> = arena
            .evaluations
            .rows
            .values()
            .filter(|e| e.submission_id == submission_id)
            .cloned()
            .collect();
        sort_evaluations_latest_first(&mut items);
        Ok(items)
    }

    async fn list_evaluations_by_grader(&self, grader_id: i64) -> Result<Vec<Evaluation>> {
        let arena = self.arena.read().await;
        let mut items: Vec<Evaluation> = arena
            .evaluations
            .rows
            .values()
            .filter(|e| e.grader_id == grader_id)
            .cloned()
            .collect();
        sort_evaluations_latest_first(&mut items);
        Ok(items)
    }

    async fn count_evaluations_by_submission(&self, submission_id: i64) -> Result<u64> {
        let arena = self.arena.read().await;
        Ok(arena
            .evaluations
            .rows
            .values()
            .filter(|e| e.submission_id == submission_id)
            .count() as u64)
    }

    async fn update_evaluation(&self, evaluation: &Evaluation) -> Result<Evaluation> {
        let mut arena = self.arena.write().await;
        let stored = arena
            .evaluations
            .rows
            .get_mut(&evaluation.id)
            .ok_or_else(|| {
                HWSystemError::not_found(format!("Evaluation {} not found", evaluation.id))
            })?;
        stored.score = evaluation.score;
        stored.comment = evaluation.comment.clone();
        stored.evaluated_at = evaluation.evaluated_at;
        Ok(stored.clone())
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        Ok(self.arena.write().await.evaluations.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theses::entities::ThesisStatus;
    use chrono::{Duration, Utc};

    async fn seed_thesis(storage: &MemoryStorage) -> Thesis {
        storage
            .create_thesis(NewThesis {
                title: "Distributed caches".to_string(),
                summary: String::new(),
                area: "Systems".to_string(),
                status: ThesisStatus::Proposed,
                author_id: 1,
                supervisor_id: 2,
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    fn new_submission(thesis_id: i64, kind: SubmissionKind, offset: i64) -> NewSubmission {
        NewSubmission {
            thesis_id,
            kind,
            note: None,
            file_ref: format!("file-{offset}"),
            sent_at: Utc::now() + Duration::seconds(offset),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let storage = MemoryStorage::new();
        let user = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Student,
        };
        storage.create_user(user.clone()).await.unwrap();
        let err = storage.create_user(user).await.unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[tokio::test]
    async fn test_latest_submission_ordering() {
        let storage = MemoryStorage::new();
        let thesis = seed_thesis(&storage).await;
        storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Partial, 0))
            .await
            .unwrap();
        let newest = storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Final, 60))
            .await
            .unwrap();
        storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Partial, 30))
            .await
            .unwrap();

        let latest = storage.get_latest_submission(thesis.id).await.unwrap();
        assert_eq!(latest.map(|s| s.id), Some(newest.id));

        let partials = storage
            .list_submissions_by_thesis(thesis.id, Some(SubmissionKind::Partial))
            .await
            .unwrap();
        assert_eq!(partials.len(), 2);
        assert!(partials[0].sent_at > partials[1].sent_at);
    }

    #[tokio::test]
    async fn test_delete_thesis_cascades() {
        let storage = MemoryStorage::new();
        let thesis = seed_thesis(&storage).await;
        let submission = storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Final, 0))
            .await
            .unwrap();
        let evaluation = storage
            .create_evaluation(NewEvaluation {
                submission_id: submission.id,
                grader_id: 2,
                score: 8.0,
                comment: None,
                evaluated_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(storage.delete_thesis(thesis.id).await.unwrap());
        assert!(
            storage
                .get_submission_by_id(submission.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_evaluation_by_id(evaluation.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.delete_thesis(thesis.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_evaluation_is_conflict() {
        let storage = MemoryStorage::new();
        let thesis = seed_thesis(&storage).await;
        let submission = storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Partial, 0))
            .await
            .unwrap();
        let evaluation = NewEvaluation {
            submission_id: submission.id,
            grader_id: 2,
            score: 5.0,
            comment: None,
            evaluated_at: Utc::now(),
        };
        storage.create_evaluation(evaluation.clone()).await.unwrap();
        let err = storage.create_evaluation(evaluation).await.unwrap_err();
        assert!(matches!(err, HWSystemError::Conflict(_)));
        assert_eq!(
            storage
                .count_evaluations_by_submission(submission.id)
                .await
                .unwrap(),
            1
        );
    }

    fn new_evaluation(submission_id: i64, grader_id: i64, offset: i64) -> NewEvaluation {
        NewEvaluation {
            submission_id,
            grader_id,
            score: 8.0,
            comment: None,
            evaluated_at: Utc::now() + Duration::seconds(offset),
        }
    }

    #[tokio::test]
    async fn test_record_evaluation_is_all_or_nothing() {
        let storage = MemoryStorage::new();
        let thesis = seed_thesis(&storage).await;
        let submission = storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Final, 0))
            .await
            .unwrap();

        // 课题写入失败时评审也不落库
        let mut missing = thesis.clone();
        missing.id = 404;
        missing.status = ThesisStatus::Concluded;
        let err = storage
            .record_evaluation(new_evaluation(submission.id, 2, 0), &missing)
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::NotFound(_)));
        assert_eq!(
            storage
                .count_evaluations_by_submission(submission.id)
                .await
                .unwrap(),
            0
        );

        let mut concluded = thesis.clone();
        concluded.status = ThesisStatus::Concluded;
        let (evaluation, stored) = storage
            .record_evaluation(new_evaluation(submission.id, 2, 0), &concluded)
            .await
            .unwrap();
        assert_eq!(evaluation.submission_id, submission.id);
        assert_eq!(stored.status, ThesisStatus::Concluded);

        // 重复评审时课题状态保持不变
        let mut rejected = thesis.clone();
        rejected.status = ThesisStatus::Rejected;
        let err = storage
            .record_evaluation(new_evaluation(submission.id, 2, 0), &rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::Conflict(_)));
        let stored = storage.get_thesis_by_id(thesis.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ThesisStatus::Concluded);
    }

    #[tokio::test]
    async fn test_evaluations_listed_latest_first() {
        let storage = MemoryStorage::new();
        let thesis = seed_thesis(&storage).await;
        let submission = storage
            .create_submission(new_submission(thesis.id, SubmissionKind::Final, 0))
            .await
            .unwrap();
        let older = storage
            .create_evaluation(new_evaluation(submission.id, 2, 0))
            .await
            .unwrap();
        let newer = storage
            .create_evaluation(new_evaluation(submission.id, 3, 60))
            .await
            .unwrap();

        let listed = storage
            .list_evaluations_by_submission(submission.id)
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_user_update_and_delete() {
        let storage = MemoryStorage::new();
        let user = storage
            .create_user(NewUser {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Student,
            })
            .await
            .unwrap();

        let updated = storage
            .update_user(
                user.id,
                UserUpdate {
                    name: Some("Ana Maria".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.password_hash, "hash");
        assert!(
            storage
                .update_user(404, UserUpdate::default())
                .await
                .unwrap()
                .is_none()
        );

        // seed_thesis 的作者是用户 1
        let thesis = seed_thesis(&storage).await;
        assert_eq!(thesis.author_id, user.id);
        let err = storage.delete_user(user.id).await.unwrap_err();
        assert!(matches!(err, HWSystemError::Conflict(_)));

        storage.delete_thesis(thesis.id).await.unwrap();
        assert!(storage.delete_user(user.id).await.unwrap());
        assert!(!storage.delete_user(user.id).await.unwrap());
    }
}
