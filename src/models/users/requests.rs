use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 用户注册请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

// 修改本人资料；密码为空或缺省时保留原密码
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UpdateProfileRequest {
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
}
