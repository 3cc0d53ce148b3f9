//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 业务规则拒绝（NotFound / Forbidden / InvalidState / Conflict / Validation）
//! 原样返回给调用方，核心层内部不做重试或恢复。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_thesis_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum HWSystemError {
            $($variant(String),)*
        }

        impl HWSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(HWSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(HWSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(HWSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl HWSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        HWSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_thesis_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Serialization("E005", "Serialization Error"),
    Authentication("E006", "Authentication Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Forbidden("E009", "Forbidden"),
    RoleViolation("E010", "Role Violation"),
    InvalidState("E011", "Invalid State"),
    Conflict("E012", "Conflict"),
}

impl HWSystemError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为业务规则拒绝（而非基础设施故障）
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            HWSystemError::Validation(_)
                | HWSystemError::NotFound(_)
                | HWSystemError::Forbidden(_)
                | HWSystemError::RoleViolation(_)
                | HWSystemError::InvalidState(_)
                | HWSystemError::Conflict(_)
        )
    }
}

impl fmt::Display for HWSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HWSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for HWSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        // 唯一约束与外键约束由数据库兜底，映射为业务冲突
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail))
            | Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return HWSystemError::Conflict(detail);
            }
            _ => {}
        }
        HWSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for HWSystemError {
    fn from(err: std::io::Error) -> Self {
        HWSystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HWSystemError {
    fn from(err: serde_json::Error) -> Self {
        HWSystemError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HWSystemError>;
