pub mod delete;
pub mod get;
pub mod register;
pub mod update;

use std::sync::Arc;

use crate::config::Argon2Config;
use crate::errors::Result;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::{RegisterUserRequest, UpdateProfileRequest};
use crate::storage::Storage;

/// 身份目录
#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn Storage>,
    argon2: Argon2Config,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, argon2: Argon2Config) -> Self {
        Self { storage, argon2 }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 注册用户
    pub async fn register_user(&self, req: RegisterUserRequest) -> Result<User> {
        register::register_user(self, req).await
    }

    // 修改本人资料
    pub async fn update_profile(&self, actor: &User, req: UpdateProfileRequest) -> Result<User> {
        update::update_profile(self, actor, req).await
    }

    // 删除用户（仅协调员）
    pub async fn delete_user(&self, user_id: i64, actor: &User) -> Result<()> {
        delete::delete_user(self, user_id, actor).await
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<User> {
        get::find_by_id(self, user_id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.storage.get_user_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.storage.list_users().await
    }

    pub async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.storage.list_users_by_role(role).await
    }

    pub async fn list_advisors(&self) -> Result<Vec<User>> {
        get::list_advisors(self).await
    }
}
