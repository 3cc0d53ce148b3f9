use tracing::info;

use super::ThesisService;
use crate::errors::{HWSystemError, Result};
use crate::models::theses::entities::{NewThesis, Thesis, ThesisStatus};
use crate::models::theses::requests::ProposeThesisRequest;
use crate::models::users::entities::{User, UserRole};
use crate::utils::validate_required;

pub async fn propose_thesis(
    service: &ThesisService,
    author: &User,
    req: ProposeThesisRequest,
) -> Result<Thesis> {
    // 标题校验先于任何查询
    validate_required(&req.title, "title").map_err(HWSystemError::validation)?;

    let supervisor = service
        .storage()
        .get_user_by_id(req.supervisor_id)
        .await?
        .ok_or_else(|| {
            HWSystemError::not_found(format!("指导教师 {} 不存在", req.supervisor_id))
        })?;

    if supervisor.role != UserRole::Advisor {
        return Err(HWSystemError::role_violation(format!(
            "用户 {} 的角色为 {}，不能担任指导教师",
            supervisor.id, supervisor.role
        )));
    }

    let thesis = service
        .storage()
        .create_thesis(NewThesis {
            title: req.title,
            summary: req.summary,
            area: req.area,
            status: ThesisStatus::InProgress,
            author_id: author.id,
            supervisor_id: supervisor.id,
            created_at: chrono::Utc::now(),
        })
        .await?;

    info!(
        "Thesis {} proposed by user {} under advisor {}",
        thesis.id, author.id, supervisor.id
    );
    Ok(thesis)
}

#[cfg(test)]
mod tests {
    use crate::models::theses::entities::ThesisStatus;
    use crate::models::theses::requests::ProposeThesisRequest;
    use crate::services::testing::Fixture;

    fn request(title: &str, supervisor_id: i64) -> ProposeThesisRequest {
        ProposeThesisRequest {
            title: title.to_string(),
            summary: "Incremental parsing".to_string(),
            area: "Compilers".to_string(),
            supervisor_id,
        }
    }

    #[tokio::test]
    async fn test_propose_sets_in_progress() {
        let fx = Fixture::new().await;
        let thesis = fx
            .theses
            .propose_thesis(&fx.student, request("Parsers", fx.advisor.id))
            .await
            .unwrap();

        assert_eq!(thesis.status, ThesisStatus::InProgress);
        assert_eq!(thesis.author_id, fx.student.id);
        assert_eq!(thesis.supervisor_id, fx.advisor.id);
        assert!(thesis.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_empty_title_checked_before_lookup() {
        let fx = Fixture::new().await;
        // 指导教师不存在，但先报标题错误
        let err = fx
            .theses
            .propose_thesis(&fx.student, request("   ", 9999))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Validation Error");
    }

    #[tokio::test]
    async fn test_missing_supervisor() {
        let fx = Fixture::new().await;
        let err = fx
            .theses
            .propose_thesis(&fx.student, request("Parsers", 9999))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "Resource Not Found");
    }

    #[tokio::test]
    async fn test_supervisor_must_be_advisor() {
        let fx = Fixture::new().await;
        for non_advisor in [fx.coordinator.id, fx.other_student.id] {
            let err = fx
                .theses
                .propose_thesis(&fx.student, request("Parsers", non_advisor))
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), "Role Violation");
        }
        assert!(fx.theses.list_all().await.unwrap().is_empty());
    }
}
