use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{HWSystemError, Result};
use crate::models::users::entities::{NewUser, User, UserRole, UserUpdate};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let err = HWSystemError::from(e);
            match err {
                HWSystemError::Conflict(_) => HWSystemError::conflict("邮箱已被注册"),
                other => HWSystemError::database_operation(format!("创建用户失败: {other}")),
            }
        })?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 按角色列出用户
    pub async fn list_users_by_role_impl(&self, role: UserRole) -> Result<Vec<User>> {
        let results = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_user()).collect())
    }

    /// 列出全部用户
    pub async fn list_users_impl(&self) -> Result<Vec<User>> {
        let results = Users::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_user()).collect())
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 更新用户资料，用户不存在时返回 None
    pub async fn update_user_impl(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(result.into_user()))
    }

    /// 删除用户；仍被课题或评审引用时由外键拒绝
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id).exec(&self.db).await.map_err(|e| {
            match HWSystemError::from(e) {
                HWSystemError::Conflict(_) => {
                    HWSystemError::conflict(format!("用户 {id} 仍被课题或评审引用，无法删除"))
                }
                other => HWSystemError::database_operation(format!("删除用户失败: {other}")),
            }
        })?;

        Ok(result.rows_affected > 0)
    }
}
