/*!
 * 操作者识别中间件
 *
 * 令牌的签发与校验由上游网关完成，网关把已认证用户的 ID 写入请求头
 * （默认 `X-User-Id`，可通过 `auth.actor_header` 配置）。此中间件读取该 ID，
 * 通过存储查出用户并放入请求扩展，后续处理程序和 `RequireRole` 从扩展中取用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireActor;
 *
 * App::new().service(
 *     web::scope("/api/v1/theses")
 *         .wrap(RequireActor)
 *         .route("", web::get().to(list_theses)),
 * );
 *
 * async fn list_theses(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let actor = RequireActor::extract_user(&req);
 *     // ...
 * }
 * ```
 *
 * 请求头缺失、格式错误或用户不存在时返回 401。
 */

use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

pub const DEFAULT_ACTOR_HEADER: &str = "X-User-Id";

/// 携带操作者 ID 的请求头名称，注册为 app_data 后覆盖默认值
#[derive(Debug, Clone)]
pub struct ActorHeader(pub String);

#[derive(Clone)]
pub struct RequireActor;

// 辅助函数：从请求头解析用户 ID 并查出用户
async fn resolve_actor(req: &ServiceRequest) -> Result<User, String> {
    let header = req
        .app_data::<web::Data<ActorHeader>>()
        .map(|h| h.0.clone())
        .unwrap_or_else(|| DEFAULT_ACTOR_HEADER.to_string());

    let user_id = req
        .headers()
        .get(header.as_str())
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| format!("Missing {header} header"))?
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid user ID in {header} header"))?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not found in app data".to_string())?
        .get_ref()
        .clone();

    storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            info!("Failed to retrieve user {}: {}", user_id, e);
            "Failed to retrieve user from storage".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RequireActor
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireActorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireActorMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireActorMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireActorMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            match resolve_actor(&req).await {
                Ok(user) => {
                    debug!("Request to {} acting as user {}", req.path(), user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!("Actor resolution failed for {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取操作者信息
impl RequireActor {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireActor中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }
}
