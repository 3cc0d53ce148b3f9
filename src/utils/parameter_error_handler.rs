use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一的错误结构
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = format!("Invalid JSON payload: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 查询参数解析失败时返回统一的错误结构
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let message = format!("Invalid query parameters: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}
