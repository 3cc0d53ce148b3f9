use tracing::info;

use super::ThesisService;
use crate::errors::Result;
use crate::models::theses::entities::{Thesis, ThesisStatus};
use crate::models::users::entities::User;
use crate::services::policy::{ThesisAction, thesis_policy};

pub async fn change_status(
    service: &ThesisService,
    thesis_id: i64,
    new_status: ThesisStatus,
    actor: &User,
) -> Result<Thesis> {
    let mut thesis = service.find_thesis(thesis_id).await?;
    thesis_policy(actor, &thesis, ThesisAction::ChangeStatus)?;

    let previous = thesis.status;
    thesis.status = new_status;
    thesis.updated_at = Some(chrono::Utc::now());
    let thesis = service.storage().update_thesis(&thesis).await?;

    info!(
        "Thesis {} status {} -> {} by user {}",
        thesis.id, previous, thesis.status, actor.id
    );
    Ok(thesis)
}
