use tracing::info;

use super::ThesisService;
use crate::errors::{HWSystemError, Result};
use crate::models::theses::entities::Thesis;
use crate::models::theses::requests::UpdateThesisRequest;
use crate::models::users::entities::{User, UserRole};
use crate::services::policy::{ThesisAction, thesis_policy};
use crate::utils::validate_required;

pub async fn update_fields(
    service: &ThesisService,
    thesis_id: i64,
    req: UpdateThesisRequest,
    actor: &User,
) -> Result<Thesis> {
    let mut thesis = service.find_thesis(thesis_id).await?;
    thesis_policy(actor, &thesis, ThesisAction::UpdateFields)?;
    validate_required(&req.title, "title").map_err(HWSystemError::validation)?;

    thesis.title = req.title;
    thesis.summary = req.summary;
    thesis.area = req.area;

    // 学生提交的状态被忽略，保持原状态
    match actor.role {
        UserRole::Student => {}
        UserRole::Advisor | UserRole::Coordinator => {
            if let Some(status) = req.status {
                thesis.status = status;
            }
        }
    }
    thesis.updated_at = Some(chrono::Utc::now());

    let thesis = service.storage().update_thesis(&thesis).await?;
    info!("Thesis {} updated by user {}", thesis.id, actor.id);
    Ok(thesis)
}

#[cfg(test)]
mod tests {
    use crate::models::theses::entities::ThesisStatus;
    use crate::models::theses::requests::UpdateThesisRequest;
    use crate::services::testing::Fixture;

    fn request(title: &str, status: Option<ThesisStatus>) -> UpdateThesisRequest {
        UpdateThesisRequest {
            title: title.to_string(),
            summary: "Revised".to_string(),
            area: "Databases".to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn test_student_status_is_ignored() {
        let fx = Fixture::new().await;
        let thesis = fx.propose().await;

        let updated = fx
            .theses
            .update_fields(
                thesis.id,
                request("Query planners", Some(ThesisStatus::Concluded)),
                &fx.student,
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Query planners");
        assert_eq!(updated.area, "Databases");
        assert_eq!(updated.status, ThesisStatus::InProgress);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_staff_status_is_applied() {
        let fx = Fixture::new().await;
        let thesis = fx.propose().await;

        let updated = fx
            .theses
            .update_fields(
                thesis.id,
                request("Query planners", Some(ThesisStatus::Proposed)),
                &fx.other_advisor,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ThesisStatus::Proposed);

        // 未给出状态时保持原状态
        let updated = fx
            .theses
            .update_fields(thesis.id, request("Planners", None), &fx.coordinator)
            .await
            .unwrap();
        assert_eq!(updated.status, ThesisStatus::Proposed);
    }

    #[tokio::test]
    async fn test_student_rules() {
        let fx = Fixture::new().await;
        let thesis = fx.propose().await;

        let err = fx
            .theses
            .update_fields(thesis.id, request("Mine now", None), &fx.other_student)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Forbidden");

        fx.theses
            .change_status(thesis.id, ThesisStatus::Rejected, &fx.advisor)
            .await
            .unwrap();
        let err = fx
            .theses
            .update_fields(thesis.id, request("Retry", None), &fx.student)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Invalid State");
    }

    #[tokio::test]
    async fn test_title_must_stay_non_empty() {
        let fx = Fixture::new().await;
        let thesis = fx.propose().await;
        let err = fx
            .theses
            .update_fields(thesis.id, request("", None), &fx.coordinator)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Validation Error");
    }
}
