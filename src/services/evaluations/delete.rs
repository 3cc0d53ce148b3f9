use tracing::{info, warn};

use super::EvaluationService;
use crate::errors::Result;
use crate::models::users::entities::User;
use crate::services::policy::{EvaluationAction, evaluation_policy};

pub async fn delete_evaluation(
    service: &EvaluationService,
    evaluation_id: i64,
    actor: &User,
) -> Result<()> {
    let evaluation = service.find_evaluation(evaluation_id).await?;
    evaluation_policy(
        actor,
        EvaluationAction::Modify {
            evaluation: &evaluation,
        },
    )?;

    if !service.storage().delete_evaluation(evaluation.id).await? {
        warn!("Evaluation {} vanished before deletion", evaluation.id);
    }
    info!("Evaluation {} deleted by user {}", evaluation.id, actor.id);
    Ok(())
}
