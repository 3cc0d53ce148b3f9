use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::errors::HWSystemError;
use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{RegisterUserRequest, UpdateProfileRequest};
use crate::models::{ApiResponse, ErrorCode, error_response};
use crate::services::UserService;

fn user_error(err: &HWSystemError) -> HttpResponse {
    let code = match err {
        HWSystemError::Conflict(_) => Some(ErrorCode::EmailAlreadyExists),
        HWSystemError::NotFound(_) => Some(ErrorCode::UserNotFound),
        _ => None,
    };
    error_response(err, code)
}

// HTTP处理程序
pub async fn register_user(
    service: web::Data<UserService>,
    user_data: web::Json<RegisterUserRequest>,
) -> ActixResult<HttpResponse> {
    match service.register_user(user_data.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user, "注册成功"))),
        Err(e) => Ok(user_error(&e)),
    }
}

pub async fn get_me(req: HttpRequest) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    Ok(HttpResponse::Ok().json(ApiResponse::success(actor, "获取当前用户成功")))
}

pub async fn update_profile(
    req: HttpRequest,
    service: web::Data<UserService>,
    profile_data: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.update_profile(&actor, profile_data.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user, "资料更新成功"))),
        Err(e) => Ok(user_error(&e)),
    }
}

pub async fn delete_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    user_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.delete_user(user_id.into_inner(), &actor).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("用户已删除"))),
        Err(e) => {
            let code = match &e {
                HWSystemError::Conflict(_) => Some(ErrorCode::UserStillReferenced),
                HWSystemError::Validation(_) => Some(ErrorCode::CanNotDeleteCurrentUser),
                HWSystemError::NotFound(_) => Some(ErrorCode::UserNotFound),
                _ => None,
            };
            Ok(error_response(&e, code))
        }
    }
}

pub async fn list_advisors(service: web::Data<UserService>) -> ActixResult<HttpResponse> {
    match service.list_advisors().await {
        Ok(advisors) => Ok(HttpResponse::Ok().json(ApiResponse::success(advisors, "获取指导教师列表成功"))),
        Err(e) => Ok(user_error(&e)),
    }
}

pub async fn list_users(service: web::Data<UserService>) -> ActixResult<HttpResponse> {
    match service.list_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(users, "获取用户列表成功"))),
        Err(e) => Ok(user_error(&e)),
    }
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .service(
                web::resource("")
                    // 注册不需要身份
                    .route(web::post().to(register_user))
                    .route(
                        web::get()
                            .to(list_users)
                            // 仅协调员可查看全部用户
                            .wrap(middlewares::RequireRole::new(&UserRole::Coordinator))
                            .wrap(middlewares::RequireActor),
                    ),
            )
            .service(
                web::resource("/me")
                    .route(web::get().to(get_me).wrap(middlewares::RequireActor))
                    // 只能修改本人资料
                    .route(web::put().to(update_profile).wrap(middlewares::RequireActor)),
            )
            .service(
                web::resource("/advisors")
                    .route(web::get().to(list_advisors).wrap(middlewares::RequireActor)),
            )
            .service(
                web::resource("/{user_id}").route(
                    web::delete()
                        .to(delete_user)
                        .wrap(middlewares::RequireRole::new(&UserRole::Coordinator))
                        .wrap(middlewares::RequireActor),
                ),
            ),
    );
}
