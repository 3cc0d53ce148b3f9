use super::ThesisService;
use crate::errors::{HWSystemError, Result};
use crate::models::theses::entities::{Thesis, ThesisStatus};
use crate::models::users::entities::{User, UserRole};
use crate::services::policy::{ThesisAction, thesis_policy};
use crate::storage::ThesisFilter;

pub async fn get_thesis(service: &ThesisService, thesis_id: i64, actor: &User) -> Result<Thesis> {
    let thesis = service.find_thesis(thesis_id).await?;
    thesis_policy(actor, &thesis, ThesisAction::View)?;
    Ok(thesis)
}

/// 学生看到自己的课题，指导教师看到指导的课题，协调员看到全部
pub async fn list_visible(
    service: &ThesisService,
    actor: &User,
    status: Option<ThesisStatus>,
) -> Result<Vec<Thesis>> {
    let filter = match actor.role {
        UserRole::Student => ThesisFilter::by_author(actor.id),
        UserRole::Advisor => ThesisFilter::by_supervisor(actor.id),
        UserRole::Coordinator => ThesisFilter::default(),
    };
    service.storage().list_theses(filter.with_status(status)).await
}

pub async fn list_all(service: &ThesisService) -> Result<Vec<Thesis>> {
    service.storage().list_theses(ThesisFilter::default()).await
}

pub async fn list_by_status(service: &ThesisService, status: ThesisStatus) -> Result<Vec<Thesis>> {
    service
        .storage()
        .list_theses(ThesisFilter::by_status(status))
        .await
}

pub async fn list_by_author(
    service: &ThesisService,
    author_id: i64,
    status: Option<ThesisStatus>,
) -> Result<Vec<Thesis>> {
    ensure_user_exists(service, author_id).await?;
    service
        .storage()
        .list_theses(ThesisFilter::by_author(author_id).with_status(status))
        .await
}

pub async fn list_by_supervisor(
    service: &ThesisService,
    supervisor_id: i64,
    status: Option<ThesisStatus>,
) -> Result<Vec<Thesis>> {
    ensure_user_exists(service, supervisor_id).await?;
    service
        .storage()
        .list_theses(ThesisFilter::by_supervisor(supervisor_id).with_status(status))
        .await
}

async fn ensure_user_exists(service: &ThesisService, user_id: i64) -> Result<()> {
    match service.storage().get_user_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => Err(HWSystemError::not_found(format!("用户 {user_id} 不存在"))),
    }
}
