use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
//
// 角色之间没有继承关系，权限判断一律精确匹配。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Student,     // 学生（课题作者）
    Advisor,     // 指导教师
    Coordinator, // 课题协调员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const ADVISOR: &'static str = "advisor";
    pub const COORDINATOR: &'static str = "coordinator";

    pub fn coordinator_roles() -> &'static [&'static UserRole] {
        &[&Self::Coordinator]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Advisor, &Self::Coordinator]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Advisor, &Self::Coordinator]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, advisor, coordinator"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Advisor => write!(f, "{}", UserRole::ADVISOR),
            UserRole::Coordinator => write!(f, "{}", UserRole::COORDINATOR),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::ADVISOR => Ok(UserRole::Advisor),
            UserRole::COORDINATOR => Ok(UserRole::Coordinator),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    pub fn is_advisor(&self) -> bool {
        self.role == UserRole::Advisor
    }

    pub fn is_coordinator(&self) -> bool {
        self.role == UserRole::Coordinator
    }
}

// 待写入的用户记录（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

// 用户资料更新，None 表示保持不变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}
