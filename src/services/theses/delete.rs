use tracing::{info, warn};

use super::ThesisService;
use crate::errors::Result;
use crate::models::users::entities::User;
use crate::services::policy::{ThesisAction, thesis_policy};

pub async fn delete_thesis(service: &ThesisService, thesis_id: i64, actor: &User) -> Result<()> {
    let thesis = service.find_thesis(thesis_id).await?;
    thesis_policy(actor, &thesis, ThesisAction::Delete)?;

    // 先删除提交文件，再删除记录（级联提交与评审）
    let submissions = service
        .storage()
        .list_submissions_by_thesis(thesis.id, None)
        .await?;
    for submission in &submissions {
        service.files().delete(&submission.file_ref).await?;
    }

    if !service.storage().delete_thesis(thesis.id).await? {
        warn!("Thesis {} vanished before deletion", thesis.id);
    }

    info!(
        "Thesis {} deleted by user {} ({} submissions removed)",
        thesis.id,
        actor.id,
        submissions.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::models::submissions::entities::SubmissionKind;
    use crate::models::theses::entities::ThesisStatus;
    use crate::services::testing::Fixture;

    #[tokio::test]
    async fn test_author_deletes_in_progress() {
        let fx = Fixture::new().await;
        let thesis = fx.propose().await;
        fx.theses.delete_thesis(thesis.id, &fx.student).await.unwrap();

        let err = fx.theses.find_thesis(thesis.id).await.unwrap_err();
        assert_eq!(err.error_type(), "Resource Not Found");
    }

    #[tokio::test]
    async fn test_student_and_advisor_restrictions() {
        let fx = Fixture::new().await;
        let thesis = fx.propose().await;

        let err = fx
            .theses
            .delete_thesis(thesis.id, &fx.other_student)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Forbidden");

        let err = fx
            .theses
            .delete_thesis(thesis.id, &fx.advisor)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Forbidden");

        fx.theses
            .change_status(thesis.id, ThesisStatus::Proposed, &fx.advisor)
            .await
            .unwrap();
        let err = fx
            .theses
            .delete_thesis(thesis.id, &fx.student)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Invalid State");
    }

    #[tokio::test]
    async fn test_coordinator_delete_cascades() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Partial).await;
        fx.evaluations_service()
            .create_evaluation(submission.id, fx.score(5.0), &fx.advisor)
            .await
            .unwrap();
        assert_eq!(fx.files.len(), 1);

        fx.theses
            .delete_thesis(thesis.id, &fx.coordinator)
            .await
            .unwrap();

        assert!(fx.storage.get_submission_by_id(submission.id).await.unwrap().is_none());
        assert!(
            fx.storage
                .list_evaluations_by_submission(submission.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(!fx.files.contains(&submission.file_ref));
    }
}
