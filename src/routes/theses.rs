use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::bad_path_param;
use crate::errors::HWSystemError;
use crate::middlewares;
use crate::models::theses::entities::ThesisStatus;
use crate::models::theses::requests::{
    ChangeStatusRequest, ProposeThesisRequest, ThesisListQuery, UpdateThesisRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, error_response};
use crate::services::ThesisService;

pub(crate) fn thesis_error(err: &HWSystemError) -> HttpResponse {
    let code = match err {
        HWSystemError::NotFound(_) => Some(ErrorCode::ThesisNotFound),
        HWSystemError::InvalidState(_) => Some(ErrorCode::ThesisInvalidState),
        HWSystemError::RoleViolation(_) => Some(ErrorCode::SupervisorNotAdvisor),
        _ => None,
    };
    error_response(err, code)
}

// HTTP处理程序
pub async fn propose_thesis(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    thesis_data: web::Json<ProposeThesisRequest>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.propose_thesis(&actor, thesis_data.into_inner()).await {
        Ok(thesis) => Ok(HttpResponse::Created().json(ApiResponse::success(thesis, "课题创建成功"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

pub async fn list_theses(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    query: web::Query<ThesisListQuery>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.list_visible(&actor, query.into_inner().status).await {
        Ok(theses) => Ok(HttpResponse::Ok().json(ApiResponse::success(theses, "获取课题列表成功"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

pub async fn list_theses_by_status(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    status: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    let status = match status.parse::<ThesisStatus>() {
        Ok(status) => status,
        Err(msg) => return Ok(bad_path_param(msg)),
    };
    // 与列表相同的可见范围，仅额外按状态筛选
    match service.list_visible(&actor, Some(status)).await {
        Ok(theses) => Ok(HttpResponse::Ok().json(ApiResponse::success(theses, "获取课题列表成功"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

pub async fn get_thesis(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    thesis_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.get_thesis(thesis_id.into_inner(), &actor).await {
        Ok(thesis) => Ok(HttpResponse::Ok().json(ApiResponse::success(thesis, "获取课题成功"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

pub async fn update_thesis(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    thesis_id: web::Path<i64>,
    update_data: web::Json<UpdateThesisRequest>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .update_fields(thesis_id.into_inner(), update_data.into_inner(), &actor)
        .await
    {
        Ok(thesis) => Ok(HttpResponse::Ok().json(ApiResponse::success(thesis, "课题更新成功"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

pub async fn change_thesis_status(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    thesis_id: web::Path<i64>,
    status_data: web::Json<ChangeStatusRequest>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .change_status(thesis_id.into_inner(), status_data.status, &actor)
        .await
    {
        Ok(thesis) => Ok(HttpResponse::Ok().json(ApiResponse::success(thesis, "课题状态已更新"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

pub async fn delete_thesis(
    req: HttpRequest,
    service: web::Data<ThesisService>,
    thesis_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.delete_thesis(thesis_id.into_inner(), &actor).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课题已删除"))),
        Err(e) => Ok(thesis_error(&e)),
    }
}

// 配置路由
pub fn configure_thesis_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/theses")
            .wrap(middlewares::RequireActor)
            .service(
                // 学生提出课题；列表按角色返回可见课题
                web::resource("").route(web::get().to(list_theses)).route(
                    web::post()
                        .to(propose_thesis)
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            )
            .service(web::resource("/status/{status}").route(web::get().to(list_theses_by_status)))
            .service(
                web::resource("/{thesis_id}")
                    .route(web::get().to(get_thesis))
                    .route(web::put().to(update_thesis))
                    .route(web::delete().to(delete_thesis)),
            )
            .service(
                web::resource("/{thesis_id}/status").route(
                    web::put()
                        .to(change_thesis_status)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            ),
    );
}
