use tracing::{info, warn};

use super::SubmissionService;
use crate::errors::Result;
use crate::models::users::entities::User;
use crate::services::policy::{SubmissionAction, submission_policy};

pub async fn delete_submission(
    service: &SubmissionService,
    submission_id: i64,
    actor: &User,
) -> Result<()> {
    let submission = service.find_submission(submission_id).await?;
    let thesis = service.theses().find_thesis(submission.thesis_id).await?;
    let evaluation_count = service
        .storage()
        .count_evaluations_by_submission(submission.id)
        .await?;
    submission_policy(actor, &thesis, SubmissionAction::Delete { evaluation_count })?;

    // 先删文件，再删记录（级联评审）
    service.files().delete(&submission.file_ref).await?;
    if !service.storage().delete_submission(submission.id).await? {
        warn!("Submission {} vanished before deletion", submission.id);
    }

    info!(
        "Submission {} of thesis {} deleted by user {}",
        submission.id, thesis.id, actor.id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::models::submissions::entities::SubmissionKind;
    use crate::services::testing::Fixture;

    #[tokio::test]
    async fn test_author_deletes_unevaluated() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Partial).await;

        fx.submissions_service()
            .delete_submission(submission.id, &fx.student)
            .await
            .unwrap();
        assert!(!fx.files.contains(&submission.file_ref));
        assert!(
            fx.storage
                .get_submission_by_id(submission.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_evaluated_submission_conflicts_for_student() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Partial).await;
        fx.evaluations_service()
            .create_evaluation(submission.id, fx.score(6.0), &fx.advisor)
            .await
            .unwrap();

        let err = fx
            .submissions_service()
            .delete_submission(submission.id, &fx.student)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Conflict");
        assert!(fx.files.contains(&submission.file_ref));

        // 协调员可以删除，评审一并删除
        fx.submissions_service()
            .delete_submission(submission.id, &fx.coordinator)
            .await
            .unwrap();
        assert_eq!(
            fx.storage
                .count_evaluations_by_submission(submission.id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_others_forbidden() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Partial).await;
        let service = fx.submissions_service();

        for actor in [&fx.other_student, &fx.advisor] {
            let err = service
                .delete_submission(submission.id, actor)
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), "Forbidden");
        }
    }
}
