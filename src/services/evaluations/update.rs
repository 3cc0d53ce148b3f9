use tracing::info;

use super::{EvaluationService, ensure_valid_score};
use crate::errors::Result;
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::UpdateEvaluationRequest;
use crate::models::users::entities::User;
use crate::services::policy::{EvaluationAction, evaluation_policy};

/// 修改分数与评语，不触发课题状态变化
pub async fn update_evaluation(
    service: &EvaluationService,
    evaluation_id: i64,
    req: UpdateEvaluationRequest,
    actor: &User,
) -> Result<Evaluation> {
    let mut evaluation = service.find_evaluation(evaluation_id).await?;
    evaluation_policy(
        actor,
        EvaluationAction::Modify {
            evaluation: &evaluation,
        },
    )?;
    ensure_valid_score(req.score)?;

    evaluation.score = req.score;
    evaluation.comment = req.comment;
    evaluation.evaluated_at = chrono::Utc::now();

    let evaluation = service.storage().update_evaluation(&evaluation).await?;
    info!("Evaluation {} updated by user {}", evaluation.id, actor.id);
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use crate::models::evaluations::requests::UpdateEvaluationRequest;
    use crate::models::submissions::entities::SubmissionKind;
    use crate::models::theses::entities::ThesisStatus;
    use crate::services::testing::Fixture;

    fn request(score: f64) -> UpdateEvaluationRequest {
        UpdateEvaluationRequest {
            score,
            comment: Some("revised".to_string()),
        }
    }

    #[tokio::test]
    async fn test_grader_updates_without_transition() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Final).await;
        let service = fx.evaluations_service();
        let evaluation = service
            .create_evaluation(submission.id, fx.score(5.0), &fx.advisor)
            .await
            .unwrap();

        let updated = service
            .update_evaluation(evaluation.id, request(9.0), &fx.advisor)
            .await
            .unwrap();
        assert_eq!(updated.score, 9.0);
        assert_eq!(updated.comment.as_deref(), Some("revised"));
        assert!(updated.evaluated_at >= evaluation.evaluated_at);

        // 仍保持创建时判定的状态
        let stored = fx.theses.find_thesis(thesis.id).await.unwrap();
        assert_eq!(stored.status, ThesisStatus::Rejected);
    }

    #[tokio::test]
    async fn test_update_rules() {
        let fx = Fixture::new().await;
        let thesis = fx.propose_open().await;
        let submission = fx.submit(&thesis, SubmissionKind::Partial).await;
        let service = fx.evaluations_service();
        let evaluation = service
            .create_evaluation(submission.id, fx.score(5.0), &fx.advisor)
            .await
            .unwrap();

        for actor in [&fx.student, &fx.other_advisor] {
            let err = service
                .update_evaluation(evaluation.id, request(6.0), actor)
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), "Forbidden");
        }

        let err = service
            .update_evaluation(evaluation.id, request(-0.5), &fx.coordinator)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Validation Error");

        let err = service
            .update_evaluation(404, request(6.0), &fx.coordinator)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Resource Not Found");

        let unchanged = service.get_evaluation(evaluation.id).await.unwrap();
        assert_eq!(unchanged.score, 5.0);
    }
}
