use super::UserService;
use crate::errors::{HWSystemError, Result};
use crate::models::users::entities::{User, UserRole};

pub async fn find_by_id(service: &UserService, user_id: i64) -> Result<User> {
    service
        .storage()
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| HWSystemError::not_found(format!("用户 {user_id} 不存在")))
}

pub async fn list_advisors(service: &UserService) -> Result<Vec<User>> {
    service.find_by_role(UserRole::Advisor).await
}
