use tracing::{info, warn};

use super::SubmissionService;
use crate::errors::Result;
use crate::models::submissions::entities::{NewSubmission, Submission};
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::users::entities::User;
use crate::services::policy::{SubmissionAction, submission_policy};

pub async fn create_submission(
    service: &SubmissionService,
    thesis_id: i64,
    req: CreateSubmissionRequest,
    actor: &User,
) -> Result<Submission> {
    let thesis = service.theses().find_thesis(thesis_id).await?;
    submission_policy(actor, &thesis, SubmissionAction::Create)?;

    // 先落盘，记录写入失败时回收文件
    let file_ref = service.files().save(&req.file_bytes, &req.file_name).await?;

    let created = service
        .storage()
        .create_submission(NewSubmission {
            thesis_id: thesis.id,
            kind: req.kind,
            note: req.note,
            file_ref: file_ref.clone(),
            sent_at: chrono::Utc::now(),
        })
        .await;

    match created {
        Ok(submission) => {
            info!(
                "Submission {} ({}) created for thesis {} by user {}",
                submission.id, submission.kind, thesis.id, actor.id
            );
            Ok(submission)
        }
        Err(e) => {
            if let Err(cleanup) = service.files().delete(&file_ref).await {
                warn!("Failed to remove orphan file {}: {}", file_ref, cleanup);
            }
            Err(e)
        }
    }
}
