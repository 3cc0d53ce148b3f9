use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::HWSystemError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 错误类别对应的 HTTP 状态码
pub fn status_code_of(err: &HWSystemError) -> StatusCode {
    match err {
        HWSystemError::Validation(_) => StatusCode::BAD_REQUEST,
        HWSystemError::NotFound(_) => StatusCode::NOT_FOUND,
        HWSystemError::Forbidden(_) => StatusCode::FORBIDDEN,
        HWSystemError::RoleViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        HWSystemError::InvalidState(_) | HWSystemError::Conflict(_) => StatusCode::CONFLICT,
        HWSystemError::Authentication(_) => StatusCode::UNAUTHORIZED,
        HWSystemError::FileOperation(_)
        | HWSystemError::DatabaseConfig(_)
        | HWSystemError::DatabaseConnection(_)
        | HWSystemError::DatabaseOperation(_)
        | HWSystemError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 把服务层错误转换为统一响应，业务码可由调用方细化
pub fn error_response(err: &HWSystemError, code: Option<ErrorCode>) -> HttpResponse {
    let code = code.unwrap_or_else(|| ErrorCode::from_error(err));
    if !err.is_business_rejection() {
        tracing::error!("{}", err);
    }
    HttpResponse::build(status_code_of(err)).json(ApiResponse::error_empty(code, err.message()))
}
