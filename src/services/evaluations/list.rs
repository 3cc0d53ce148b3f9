use super::EvaluationService;
use crate::errors::{HWSystemError, Result};
use crate::models::evaluations::entities::Evaluation;
use crate::models::users::entities::User;
use crate::services::policy::{EvaluationAction, evaluation_policy};

pub async fn list_by_submission(
    service: &EvaluationService,
    submission_id: i64,
    requester: &User,
) -> Result<Vec<Evaluation>> {
    let submission = service
        .storage()
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| HWSystemError::not_found(format!("提交 {submission_id} 不存在")))?;
    let thesis = service.theses().find_thesis(submission.thesis_id).await?;
    evaluation_policy(requester, EvaluationAction::View { thesis: &thesis })?;

    service
        .storage()
        .list_evaluations_by_submission(submission.id)
        .await
}

// 不做权限限制
pub async fn list_by_grader(service: &EvaluationService, grader_id: i64) -> Result<Vec<Evaluation>> {
    service.storage().list_evaluations_by_grader(grader_id).await
}

#[cfg(test)]
mod tests {
    use crate::models::submissions::entities::SubmissionKind;
    use crate::services::testing::Fixture;

    #[tokio::test]
    async fn test_list_by_submission_access() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Final).await;
        let service = fx.evaluations_service();
        let evaluation = service
            .create_evaluation(submission.id, fx.score(7.0), &fx.advisor)
            .await
            .unwrap();

        for actor in [&fx.student, &fx.advisor, &fx.coordinator] {
            let listed = service.list_by_submission(submission.id, actor).await.unwrap();
            assert_eq!(listed, vec![evaluation.clone()]);
        }
        for actor in [&fx.other_student, &fx.other_advisor] {
            let err = service
                .list_by_submission(submission.id, actor)
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), "Forbidden");
        }
    }

    #[tokio::test]
    async fn test_list_by_grader() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Partial).await;
        let service = fx.evaluations_service();
        service
            .create_evaluation(submission.id, fx.score(3.0), &fx.advisor)
            .await
            .unwrap();

        assert_eq!(service.list_by_grader(fx.advisor.id).await.unwrap().len(), 1);
        assert!(service.list_by_grader(fx.coordinator.id).await.unwrap().is_empty());
    }
}
