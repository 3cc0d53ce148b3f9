use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use super::bad_path_param;
use crate::config::UploadConfig;
use crate::errors::HWSystemError;
use crate::middlewares;
use crate::models::submissions::entities::SubmissionKind;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode, error_response};
use crate::services::SubmissionService;

pub(crate) fn submission_error(err: &HWSystemError) -> HttpResponse {
    let code = match err {
        HWSystemError::NotFound(_) => Some(ErrorCode::SubmissionNotFound),
        HWSystemError::InvalidState(_) => Some(ErrorCode::ThesisInvalidState),
        HWSystemError::Conflict(_) => Some(ErrorCode::SubmissionHasEvaluations),
        HWSystemError::FileOperation(_) => Some(ErrorCode::FileUploadFailed),
        _ => None,
    };
    error_response(err, code)
}

fn upload_error(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 解析提交表单：`kind`、可选的 `note` 和唯一的 `file`
async fn read_submission_form(
    mut payload: Multipart,
    max_size: usize,
) -> Result<CreateSubmissionRequest, HttpResponse> {
    let mut kind: Option<SubmissionKind> = None;
    let mut note: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == "file" {
            if file.is_some() {
                return Err(upload_error(
                    ErrorCode::MultifileUploadNotAllowed,
                    "Only one file can be uploaded at a time",
                ));
            }
            let original_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    upload_error(ErrorCode::FileUploadFailed, &format!("读取文件失败: {e}"))
                })?;
                // 校验大小
                if bytes.len() + data.len() > max_size {
                    return Err(upload_error(
                        ErrorCode::FileSizeExceeded,
                        "File size exceeds the limit",
                    ));
                }
                bytes.extend_from_slice(&data);
            }
            file = Some((original_name, bytes));
        } else {
            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    upload_error(ErrorCode::BadRequest, &format!("读取表单失败: {e}"))
                })?;
                bytes.extend_from_slice(&data);
            }
            let value = String::from_utf8_lossy(&bytes).trim().to_string();
            match name.as_str() {
                "kind" => {
                    kind = Some(value.parse().map_err(|msg: String| {
                        upload_error(ErrorCode::ValidationFailed, &msg)
                    })?);
                }
                "note" if !value.is_empty() => note = Some(value),
                _ => {}
            }
        }
    }

    let Some(kind) = kind else {
        return Err(upload_error(
            ErrorCode::ValidationFailed,
            "Missing submission kind",
        ));
    };
    let Some((file_name, file_bytes)) = file else {
        return Err(upload_error(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    Ok(CreateSubmissionRequest {
        kind,
        note,
        file_name,
        file_bytes,
    })
}

// HTTP处理程序
pub async fn create_submission(
    req: HttpRequest,
    service: web::Data<SubmissionService>,
    thesis_id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    let max_size = req
        .app_data::<web::Data<UploadConfig>>()
        .map(|c| c.max_size)
        .unwrap_or_else(|| UploadConfig::default().max_size);

    let form = match read_submission_form(payload, max_size).await {
        Ok(form) => form,
        Err(resp) => return Ok(resp),
    };

    match service
        .create_submission(thesis_id.into_inner(), form, &actor)
        .await
    {
        Ok(submission) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(HWSystemError::NotFound(msg)) => Ok(error_response(
            &HWSystemError::NotFound(msg),
            Some(ErrorCode::ThesisNotFound),
        )),
        Err(e) => Ok(submission_error(&e)),
    }
}

pub async fn list_submissions(
    req: HttpRequest,
    service: web::Data<SubmissionService>,
    thesis_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service.list_by_thesis(thesis_id.into_inner(), &actor).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取提交列表成功"))),
        Err(e) => Ok(super::theses::thesis_error(&e)),
    }
}

pub async fn latest_submission(
    service: web::Data<SubmissionService>,
    thesis_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match service.latest_by_thesis(thesis_id.into_inner()).await {
        Ok(latest) => Ok(HttpResponse::Ok().json(ApiResponse::success(latest, "获取最新提交成功"))),
        Err(e) => Ok(super::theses::thesis_error(&e)),
    }
}

pub async fn list_submissions_by_kind(
    service: web::Data<SubmissionService>,
    path: web::Path<(i64, String)>,
) -> ActixResult<HttpResponse> {
    let (thesis_id, kind) = path.into_inner();
    let kind = match kind.parse::<SubmissionKind>() {
        Ok(kind) => kind,
        Err(msg) => return Ok(bad_path_param(msg)),
    };
    match service.list_by_thesis_and_kind(thesis_id, kind).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取提交列表成功"))),
        Err(e) => Ok(super::theses::thesis_error(&e)),
    }
}

pub async fn get_submission(
    req: HttpRequest,
    service: web::Data<SubmissionService>,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .get_submission(submission_id.into_inner(), &actor)
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "获取提交成功"))),
        Err(e) => Ok(submission_error(&e)),
    }
}

pub async fn delete_submission(
    req: HttpRequest,
    service: web::Data<SubmissionService>,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = actor_or_return!(req);
    match service
        .delete_submission(submission_id.into_inner(), &actor)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("提交已删除"))),
        Err(e) => Ok(submission_error(&e)),
    }
}

// 配置路由
//
// 这里注册的是完整路径的 resource，必须排在 `/api/v1/theses` scope 之前。
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/theses/{thesis_id}/submissions")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(list_submissions))
            .route(web::post().to(create_submission)),
    )
    .service(
        web::resource("/api/v1/theses/{thesis_id}/submissions/latest")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(latest_submission)),
    )
    .service(
        web::resource("/api/v1/theses/{thesis_id}/submissions/kind/{kind}")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(list_submissions_by_kind)),
    )
    .service(
        web::resource("/api/v1/submissions/{submission_id}")
            .wrap(middlewares::RequireActor)
            .route(web::get().to(get_submission))
            .route(web::delete().to(delete_submission)),
    );
}
