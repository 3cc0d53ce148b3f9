use tracing::info;

use super::UserService;
use crate::errors::{HWSystemError, Result};
use crate::models::users::entities::{NewUser, User};
use crate::models::users::requests::RegisterUserRequest;
use crate::utils::{hash_password, validate_email, validate_required};

pub async fn register_user(service: &UserService, req: RegisterUserRequest) -> Result<User> {
    validate_required(&req.name, "name").map_err(HWSystemError::validation)?;
    validate_email(&req.email).map_err(HWSystemError::validation)?;
    if req.password.is_empty() {
        return Err(HWSystemError::validation("password must not be empty"));
    }

    // 检查邮箱是否已存在
    if service
        .storage()
        .get_user_by_email(&req.email)
        .await?
        .is_some()
    {
        return Err(HWSystemError::conflict("邮箱已被注册"));
    }

    let password_hash = hash_password(&req.password, &service.argon2)?;
    let user = service
        .storage()
        .create_user(NewUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
            role: req.role,
        })
        .await?;

    info!("User {} registered as {}", user.id, user.role);
    Ok(user)
}
