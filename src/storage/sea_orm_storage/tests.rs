//! 基于内存 SQLite 的存储测试，迁移与外键与生产环境一致

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::SqlxSqliteConnector;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use super::SeaOrmStorage;
use crate::errors::HWSystemError;
use crate::models::evaluations::entities::NewEvaluation;
use crate::models::submissions::entities::{NewSubmission, SubmissionKind};
use crate::models::theses::entities::{NewThesis, Thesis, ThesisStatus};
use crate::models::users::entities::{NewUser, User, UserRole, UserUpdate};
use crate::storage::{Storage, ThesisFilter};

// 内存库只存在于单个连接上，连接池固定为一个连接
async fn sqlite_storage() -> SeaOrmStorage {
    let opt = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opt)
        .await
        .unwrap();
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&db, None).await.unwrap();
    SeaOrmStorage { db }
}

async fn user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> User {
    storage
        .create_user(NewUser {
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase()),
            password_hash: "hash".to_string(),
            role,
        })
        .await
        .unwrap()
}

async fn thesis(storage: &SeaOrmStorage, author: &User, supervisor: &User) -> Thesis {
    storage
        .create_thesis(NewThesis {
            title: "Query planners".to_string(),
            summary: "Cost based".to_string(),
            area: "Databases".to_string(),
            status: ThesisStatus::Proposed,
            author_id: author.id,
            supervisor_id: supervisor.id,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}

fn submission(thesis_id: i64, kind: SubmissionKind, offset: i64) -> NewSubmission {
    NewSubmission {
        thesis_id,
        kind,
        note: None,
        file_ref: format!("file-{offset}"),
        sent_at: Utc::now() + Duration::seconds(offset),
    }
}

fn evaluation(submission_id: i64, grader_id: i64, offset: i64) -> NewEvaluation {
    NewEvaluation {
        submission_id,
        grader_id,
        score: 8.0,
        comment: Some("ok".to_string()),
        evaluated_at: Utc::now() + Duration::seconds(offset),
    }
}

#[tokio::test]
async fn test_users_round_trip() {
    let storage = sqlite_storage().await;
    let carla = user(&storage, "Carla", UserRole::Advisor).await;
    let ana = user(&storage, "Ana", UserRole::Student).await;
    let diego = user(&storage, "Diego", UserRole::Advisor).await;

    let err = storage
        .create_user(NewUser {
            name: "Other Ana".to_string(),
            email: "ana@uni.edu".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Student,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HWSystemError::Conflict(_)));

    let found = storage.get_user_by_email("ana@uni.edu").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(ana.id));

    let advisors = storage.list_users_by_role(UserRole::Advisor).await.unwrap();
    let ids: Vec<i64> = advisors.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![carla.id, diego.id]);
    assert_eq!(storage.count_users().await.unwrap(), 3);

    let updated = storage
        .update_user(
            ana.id,
            UserUpdate {
                name: Some("Ana Maria".to_string()),
                password_hash: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.email, "ana@uni.edu");
    assert_eq!(updated.password_hash, "hash");
    assert_eq!(updated.role, UserRole::Student);
    assert!(
        storage
            .update_user(
                404,
                UserUpdate {
                    name: Some("Nobody".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_referenced_user_cannot_be_deleted() {
    let storage = sqlite_storage().await;
    let ana = user(&storage, "Ana", UserRole::Student).await;
    let carla = user(&storage, "Carla", UserRole::Advisor).await;
    let bruno = user(&storage, "Bruno", UserRole::Student).await;
    let thesis = thesis(&storage, &ana, &carla).await;

    // 外键 RESTRICT 拒绝删除
    assert!(storage.delete_user(carla.id).await.is_err());
    assert!(storage.get_user_by_id(carla.id).await.unwrap().is_some());

    assert!(storage.delete_user(bruno.id).await.unwrap());
    assert!(!storage.delete_user(bruno.id).await.unwrap());

    storage.delete_thesis(thesis.id).await.unwrap();
    assert!(storage.delete_user(carla.id).await.unwrap());
}

#[tokio::test]
async fn test_update_thesis_keeps_ownership() {
    let storage = sqlite_storage().await;
    let ana = user(&storage, "Ana", UserRole::Student).await;
    let carla = user(&storage, "Carla", UserRole::Advisor).await;
    let created = thesis(&storage, &ana, &carla).await;
    assert!(created.updated_at.is_none());

    let mut changed = created.clone();
    changed.title = "Adaptive query planners".to_string();
    changed.status = ThesisStatus::InProgress;
    changed.updated_at = Some(Utc::now());
    // 作者与指导教师不属于可变字段
    changed.author_id = carla.id;
    changed.supervisor_id = ana.id;
    storage.update_thesis(&changed).await.unwrap();

    let stored = storage.get_thesis_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Adaptive query planners");
    assert_eq!(stored.summary, "Cost based");
    assert_eq!(stored.status, ThesisStatus::InProgress);
    assert_eq!(stored.author_id, ana.id);
    assert_eq!(stored.supervisor_id, carla.id);
    assert_eq!(
        stored.created_at.timestamp_millis(),
        created.created_at.timestamp_millis()
    );
    assert!(stored.updated_at.is_some());

    let by_author = storage
        .list_theses(ThesisFilter::by_author(ana.id).with_status(Some(ThesisStatus::InProgress)))
        .await
        .unwrap();
    assert_eq!(by_author.len(), 1);
    let by_supervisor = storage
        .list_theses(ThesisFilter::by_supervisor(carla.id).with_status(Some(ThesisStatus::Concluded)))
        .await
        .unwrap();
    assert!(by_supervisor.is_empty());
}

#[tokio::test]
async fn test_submission_ordering_and_cascade() {
    let storage = sqlite_storage().await;
    let ana = user(&storage, "Ana", UserRole::Student).await;
    let carla = user(&storage, "Carla", UserRole::Advisor).await;
    let elisa = user(&storage, "Elisa", UserRole::Coordinator).await;
    let thesis = thesis(&storage, &ana, &carla).await;

    let first = storage
        .create_submission(submission(thesis.id, SubmissionKind::Partial, 0))
        .await
        .unwrap();
    let newest = storage
        .create_submission(submission(thesis.id, SubmissionKind::Final, 60))
        .await
        .unwrap();
    let latest = storage.get_latest_submission(thesis.id).await.unwrap();
    assert_eq!(latest.map(|s| s.id), Some(newest.id));
    let partials = storage
        .list_submissions_by_thesis(thesis.id, Some(SubmissionKind::Partial))
        .await
        .unwrap();
    assert_eq!(partials.iter().map(|s| s.id).collect::<Vec<_>>(), vec![first.id]);

    let older = storage
        .create_evaluation(evaluation(newest.id, carla.id, 0))
        .await
        .unwrap();
    let newer = storage
        .create_evaluation(evaluation(newest.id, elisa.id, 30))
        .await
        .unwrap();
    let listed = storage.list_evaluations_by_submission(newest.id).await.unwrap();
    assert_eq!(
        listed.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );

    // 删除提交时一并删除评审
    assert!(storage.delete_submission(newest.id).await.unwrap());
    assert!(storage.get_evaluation_by_id(older.id).await.unwrap().is_none());
    assert_eq!(storage.count_evaluations_by_submission(newest.id).await.unwrap(), 0);

    storage
        .create_evaluation(evaluation(first.id, carla.id, 0))
        .await
        .unwrap();

    // 删除课题时一并删除提交与评审
    assert!(storage.delete_thesis(thesis.id).await.unwrap());
    assert!(storage.get_submission_by_id(first.id).await.unwrap().is_none());
    assert!(storage.list_evaluations_by_grader(carla.id).await.unwrap().is_empty());
    assert!(!storage.delete_thesis(thesis.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_evaluation_is_conflict() {
    let storage = sqlite_storage().await;
    let ana = user(&storage, "Ana", UserRole::Student).await;
    let carla = user(&storage, "Carla", UserRole::Advisor).await;
    let thesis = thesis(&storage, &ana, &carla).await;
    let sent = storage
        .create_submission(submission(thesis.id, SubmissionKind::Final, 0))
        .await
        .unwrap();

    storage
        .create_evaluation(evaluation(sent.id, carla.id, 0))
        .await
        .unwrap();
    let err = storage
        .create_evaluation(evaluation(sent.id, carla.id, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, HWSystemError::Conflict(_)));
    assert_eq!(storage.count_evaluations_by_submission(sent.id).await.unwrap(), 1);

    let found = storage
        .get_evaluation_by_submission_and_grader(sent.id, carla.id)
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_record_evaluation_rolls_back() {
    let storage = sqlite_storage().await;
    let ana = user(&storage, "Ana", UserRole::Student).await;
    let carla = user(&storage, "Carla", UserRole::Advisor).await;
    let created = thesis(&storage, &ana, &carla).await;
    let sent = storage
        .create_submission(submission(created.id, SubmissionKind::Final, 0))
        .await
        .unwrap();

    // 课题更新失败，已插入的评审随事务回滚
    let mut missing = created.clone();
    missing.id = 404;
    missing.status = ThesisStatus::Concluded;
    assert!(
        storage
            .record_evaluation(evaluation(sent.id, carla.id, 0), &missing)
            .await
            .is_err()
    );
    assert_eq!(storage.count_evaluations_by_submission(sent.id).await.unwrap(), 0);

    let mut concluded = created.clone();
    concluded.status = ThesisStatus::Concluded;
    concluded.updated_at = Some(Utc::now());
    let (recorded, moved) = storage
        .record_evaluation(evaluation(sent.id, carla.id, 0), &concluded)
        .await
        .unwrap();
    assert_eq!(recorded.grader_id, carla.id);
    assert_eq!(moved.status, ThesisStatus::Concluded);

    // 重复评审时课题状态不变
    let mut rejected = created.clone();
    rejected.status = ThesisStatus::Rejected;
    let err = storage
        .record_evaluation(evaluation(sent.id, carla.id, 5), &rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, HWSystemError::Conflict(_)));
    let stored = storage.get_thesis_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ThesisStatus::Concluded);
}
