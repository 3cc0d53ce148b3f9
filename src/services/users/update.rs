use tracing::info;

use super::UserService;
use crate::errors::{HWSystemError, Result};
use crate::models::users::entities::{User, UserUpdate};
use crate::models::users::requests::UpdateProfileRequest;
use crate::utils::{hash_password, validate_required};

/// 修改本人资料：姓名必填，密码非空时重新哈希
pub async fn update_profile(
    service: &UserService,
    actor: &User,
    req: UpdateProfileRequest,
) -> Result<User> {
    validate_required(&req.name, "name").map_err(HWSystemError::validation)?;

    let password_hash = match req.password.as_deref() {
        Some(password) if !password.is_empty() => Some(hash_password(password, &service.argon2)?),
        _ => None,
    };
    let password_changed = password_hash.is_some();

    let user = service
        .storage()
        .update_user(
            actor.id,
            UserUpdate {
                name: Some(req.name.trim().to_string()),
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| HWSystemError::not_found(format!("用户 {} 不存在", actor.id)))?;

    info!(
        "User {} updated profile (password changed: {})",
        user.id, password_changed
    );
    Ok(user)
}
