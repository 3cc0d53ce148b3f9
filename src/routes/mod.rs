// 取出当前用户，缺失时直接返回 401 响应
macro_rules! actor_or_return {
    ($req:expr) => {
        match $crate::routes::current_actor(&$req) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        }
    };
}

pub mod evaluations;

pub mod submissions;

pub mod theses;

pub mod users;

pub use evaluations::configure_evaluation_routes;
pub use submissions::configure_submission_routes;
pub use theses::configure_thesis_routes;
pub use users::configure_user_routes;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireActor;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 取出 RequireActor 放入的当前用户
pub(crate) fn current_actor(req: &HttpRequest) -> Result<User, HttpResponse> {
    RequireActor::extract_user(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "用户未登录",
        ))
    })
}

/// 路径参数解析失败时的统一响应
pub(crate) fn bad_path_param(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

/// 注册全部 API 路由
///
/// 提交与评审使用完整路径的 resource，需先于 `/api/v1/theses` scope 注册。
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    configure_user_routes(cfg);
    configure_submission_routes(cfg);
    configure_evaluation_routes(cfg);
    configure_thesis_routes(cfg);
}
