use tracing::info;

use super::UserService;
use crate::errors::{HWSystemError, Result};
use crate::models::users::entities::{User, UserRole};
use crate::storage::ThesisFilter;

pub async fn delete_user(service: &UserService, user_id: i64, actor: &User) -> Result<()> {
    match actor.role {
        UserRole::Coordinator => {}
        UserRole::Student | UserRole::Advisor => {
            return Err(HWSystemError::forbidden("只有协调员可以删除用户"));
        }
    }
    if user_id == actor.id {
        return Err(HWSystemError::validation("不能删除当前登录的用户"));
    }

    let user = super::get::find_by_id(service, user_id).await?;

    // 仍被课题或评审引用的用户不能删除
    let storage = service.storage();
    let referenced = !storage
        .list_theses(ThesisFilter::by_author(user.id))
        .await?
        .is_empty()
        || !storage
            .list_theses(ThesisFilter::by_supervisor(user.id))
            .await?
            .is_empty()
        || !storage
            .list_evaluations_by_grader(user.id)
            .await?
            .is_empty();
    if referenced {
        return Err(HWSystemError::conflict(format!(
            "用户 {} 仍有关联的课题或评审，无法删除",
            user.id
        )));
    }

    if !storage.delete_user(user.id).await? {
        return Err(HWSystemError::not_found(format!("用户 {user_id} 不存在")));
    }

    info!("User {} ({}) deleted by user {}", user.id, user.role, actor.id);
    Ok(())
}
