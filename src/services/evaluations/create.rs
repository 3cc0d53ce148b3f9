use tracing::info;

use super::{EvaluationService, ensure_valid_score};
use crate::errors::{HWSystemError, Result};
use crate::models::evaluations::entities::{Evaluation, NewEvaluation, PASSING_SCORE};
use crate::models::evaluations::requests::CreateEvaluationRequest;
use crate::models::submissions::entities::SubmissionKind;
use crate::models::theses::entities::ThesisStatus;
use crate::models::users::entities::User;
use crate::services::policy::{
    EvaluationAction, ThesisAction, evaluation_policy, thesis_policy,
};

/// 评审结果对应的课题状态：最终稿且及格为完成，其余为未通过
pub fn outcome_status(kind: SubmissionKind, score: f64) -> ThesisStatus {
    match kind {
        SubmissionKind::Final if score >= PASSING_SCORE => ThesisStatus::Concluded,
        SubmissionKind::Final | SubmissionKind::Partial => ThesisStatus::Rejected,
    }
}

pub async fn create_evaluation(
    service: &EvaluationService,
    submission_id: i64,
    req: CreateEvaluationRequest,
    grader: &User,
) -> Result<Evaluation> {
    let submission = service
        .storage()
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| HWSystemError::not_found(format!("提交 {submission_id} 不存在")))?;
    let thesis = service.theses().find_thesis(submission.thesis_id).await?;

    evaluation_policy(grader, EvaluationAction::Create { thesis: &thesis })?;

    if service
        .storage()
        .get_evaluation_by_submission_and_grader(submission.id, grader.id)
        .await?
        .is_some()
    {
        return Err(HWSystemError::conflict(
            "该评审人已评审过此提交，请修改已有评审",
        ));
    }

    ensure_valid_score(req.score)?;

    // 评审人同时需要改课题状态的权限，落库前一并检查
    thesis_policy(grader, &thesis, ThesisAction::ChangeStatus)?;

    let target = outcome_status(submission.kind, req.score);
    let previous = thesis.status;
    let mut moved = thesis;
    moved.status = target;
    moved.updated_at = Some(chrono::Utc::now());

    let (evaluation, thesis) = service
        .storage()
        .record_evaluation(
            NewEvaluation {
                submission_id: submission.id,
                grader_id: grader.id,
                score: req.score,
                comment: req.comment,
                evaluated_at: chrono::Utc::now(),
            },
            &moved,
        )
        .await?;

    info!(
        "Evaluation {} ({}) by user {} moved thesis {} {} -> {}",
        evaluation.id, evaluation.score, grader.id, thesis.id, previous, thesis.status
    );
    Ok(evaluation)
}
