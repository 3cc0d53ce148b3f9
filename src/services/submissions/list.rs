use super::SubmissionService;
use crate::errors::Result;
use crate::models::submissions::entities::{Submission, SubmissionKind};
use crate::models::users::entities::User;
use crate::services::policy::{SubmissionAction, submission_policy};

pub async fn list_by_thesis(
    service: &SubmissionService,
    thesis_id: i64,
    requester: &User,
) -> Result<Vec<Submission>> {
    let thesis = service.theses().find_thesis(thesis_id).await?;
    submission_policy(requester, &thesis, SubmissionAction::View)?;
    service
        .storage()
        .list_submissions_by_thesis(thesis.id, None)
        .await
}

pub async fn latest_by_thesis(
    service: &SubmissionService,
    thesis_id: i64,
) -> Result<Option<Submission>> {
    let thesis = service.theses().find_thesis(thesis_id).await?;
    service.storage().get_latest_submission(thesis.id).await
}

pub async fn list_by_thesis_and_kind(
    service: &SubmissionService,
    thesis_id: i64,
    kind: SubmissionKind,
) -> Result<Vec<Submission>> {
    let thesis = service.theses().find_thesis(thesis_id).await?;
    service
        .storage()
        .list_submissions_by_thesis(thesis.id, Some(kind))
        .await
}

pub async fn get_submission(
    service: &SubmissionService,
    submission_id: i64,
    requester: &User,
) -> Result<Submission> {
    let submission = service.find_submission(submission_id).await?;
    let thesis = service.theses().find_thesis(submission.thesis_id).await?;
    submission_policy(requester, &thesis, SubmissionAction::View)?;
    Ok(submission)
}
