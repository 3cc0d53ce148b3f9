use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::errors::HWSystemError;
use crate::middlewares;
use crate::models::evaluations::requests::{CreateEvaluationRequest, UpdateEvaluationRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, error_response};
use crate::services::EvaluationService;

fn evaluation_error(err: &HWSystemError) -> HttpResponse {
    let code = match err {
        HWSystemError::NotFound(_) => Some(ErrorCode::EvaluationNotFound),
        HWSystemError::Conflict(_) => Some(ErrorCode::EvaluationAlreadyExists),
        _ => None,
    };
    error_response(err, code)
}

// HTTP处理程序
pub async fn create_evaluation(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    submission_id: web::Path<i64>,
    evaluation_data: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let grader = actor_or_return!(req);
    match service
        .create_evaluation(submission_id.into_inner(), evaluation_data.into_inner(), &grader)
        .await
    {
        Ok(evaluation) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(evaluation, "评审成功")))
        }
        Err(HWSystemError::NotFound(msg)) => Ok(error_response(
            &HWSystemError::NotFound(msg),
            Some(ErrorCode::SubmissionNotFound),
        )),
        Err(e) => Ok(evaluation_error(&e)),
    }
}

pub async fn list_evaluations(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .list_by_submission(submission_id.into_inner(), &actor)
        .await
    {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取评审列表成功"))),
        Err(HWSystemError::NotFound(msg)) => Ok(error_response(
            &HWSystemError::NotFound(msg),
            Some(ErrorCode::SubmissionNotFound),
        )),
        Err(e) => Ok(evaluation_error(&e)),
    }
}

pub async fn list_grader_evaluations(
    service: web::Data<EvaluationService>,
    grader_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match service.list_by_grader(grader_id.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取评审列表成功"))),
        Err(e) => Ok(evaluation_error(&e)),
    }
}

pub async fn get_evaluation(
    service: web::Data<EvaluationService>,
    evaluation_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match service.get_evaluation(evaluation_id.into_inner()).await {
        Ok(evaluation) => Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "获取评审成功"))),
        Err(e) => Ok(evaluation_error(&e)),
    }
}

pub async fn update_evaluation(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    evaluation_id: web::Path<i64>,
    update_data: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .update_evaluation(evaluation_id.into_inner(), update_data.into_inner(), &actor)
        .await
    {
        Ok(evaluation) => Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "评审已更新"))),
        Err(e) => Ok(evaluation_error(&e)),
    }
}

pub async fn delete_evaluation(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    evaluation_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .delete_evaluation(evaluation_id.into_inner(), &actor)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("评审已删除"))),
        Err(e) => Ok(evaluation_error(&e)),
    }
}

// 配置路由
//
// 与提交路由相同，使用完整路径的 resource。
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/submissions/{submission_id}/evaluations")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(list_evaluations))
            .route(
                web::post()
                    .to(create_evaluation)
                    // 学生不能评审
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    )
    .service(
        web::resource("/api/v1/evaluations/grader/{grader_id}")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(list_grader_evaluations)),
    )
    .service(
        web::resource("/api/v1/evaluations/{evaluation_id}")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(get_evaluation))
            .route(web::put().to(update_evaluation))
            .route(web::delete().to(delete_evaluation)),
    );
}
