//! 数据模型定义
//!
//! 业务实体、请求 DTO 与统一响应结构。

pub mod common;
pub mod evaluations;
pub mod submissions;
pub mod theses;
pub mod users;

pub use common::{ApiResponse, ErrorCode, error_response};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
