//! Callable 端点
//!
//! 移动端以 `POST {prefix}/{name}` 调用，请求体为 `{"data": ...}`；
//! 成功返回 `{"result": ...}`，失败返回 `{"error": {"status", "message"}}`。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::identity::{CallerIdentity, UNAUTHENTICATED_MESSAGE};
use crate::errors::SharelinkerError;
use crate::services::{
    CaptionRequest, CaptionService, LinkRequest, LinkService, TrackRequest, TrackingService,
};

/// 请求信封
#[derive(Debug, Deserialize)]
pub struct CallableRequest<T> {
    pub data: T,
}

/// 成功响应信封
#[derive(Debug, Serialize, Deserialize)]
pub struct CallableResult<T> {
    pub result: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallableErrorDetail {
    pub status: String,
    pub message: String,
}

/// 失败响应信封
#[derive(Debug, Serialize, Deserialize)]
pub struct CallableError {
    pub error: CallableErrorDetail,
}

/// 错误 → (HTTP 状态码, 调用方可见的状态名)
pub fn callable_status(err: &SharelinkerError) -> (StatusCode, &'static str) {
    match err {
        SharelinkerError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
        SharelinkerError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    }
}

/// 构建错误响应
pub fn callable_error(err: &SharelinkerError) -> HttpResponse {
    let (status, code) = callable_status(err);
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(CallableError {
            error: CallableErrorDetail {
                status: code.to_string(),
                message: err.message().to_string(),
            },
        })
}

/// 统一 Result → HttpResponse 转换
pub fn callable_response<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(CallableResult { result: data }),
        Err(e) => callable_error(&e),
    }
}

/// 请求体解析失败时返回 400 INVALID_ARGUMENT
///
/// 这是传输层错误，服务层的失败只会以 UNAUTHENTICATED 或 INTERNAL 返回。
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected callable payload: {}", err);
    let response = callable_error(&SharelinkerError::invalid_argument(format!(
        "Invalid request body: {}",
        err
    )));
    actix_web::error::InternalError::from_response(err, response).into()
}

/// 需要身份的端点：先校验身份，再看请求体
///
/// 未认证的调用方无论请求体是否完整都得到 UNAUTHENTICATED。
fn authenticated_payload<T>(
    identity: Option<&CallerIdentity>,
    body: Result<web::Json<CallableRequest<T>>, actix_web::Error>,
) -> Result<T, HttpResponse> {
    if identity.is_none() {
        return Err(callable_error(&SharelinkerError::unauthenticated(
            UNAUTHENTICATED_MESSAGE,
        )));
    }
    body.map(|b| b.into_inner().data)
        .map_err(|e| e.error_response())
}

pub struct CallableService;

impl CallableService {
    pub async fn generate_sharing_caption(
        service: web::Data<Arc<CaptionService>>,
        identity: Option<web::ReqData<CallerIdentity>>,
        body: Result<web::Json<CallableRequest<CaptionRequest>>, actix_web::Error>,
    ) -> HttpResponse {
        trace!("generateSharingCaption called");
        let identity = identity.map(|i| i.into_inner());
        let req = match authenticated_payload(identity.as_ref(), body) {
            Ok(req) => req,
            Err(resp) => return resp,
        };
        callable_response(service.generate_caption(identity.as_ref(), req).await)
    }

    pub async fn generate_sharing_link(
        service: web::Data<Arc<LinkService>>,
        identity: Option<web::ReqData<CallerIdentity>>,
        body: Result<web::Json<CallableRequest<LinkRequest>>, actix_web::Error>,
    ) -> HttpResponse {
        trace!("generateSharingLink called");
        let identity = identity.map(|i| i.into_inner());
        let req = match authenticated_payload(identity.as_ref(), body) {
            Ok(req) => req,
            Err(resp) => return resp,
        };
        callable_response(service.generate_link(identity.as_ref(), req).await)
    }

    pub async fn track_sharing_click(
        service: web::Data<Arc<TrackingService>>,
        body: web::Json<CallableRequest<TrackRequest>>,
    ) -> HttpResponse {
        trace!("trackSharingClick called");
        callable_response(service.track_click(body.into_inner().data).await)
    }
}

/// Callable 路由配置
pub fn callable_routes() -> actix_web::Scope {
    web::scope("")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route(
            "/generateSharingCaption",
            web::post().to(CallableService::generate_sharing_caption),
        )
        .route(
            "/generateSharingLink",
            web::post().to(CallableService::generate_sharing_link),
        )
        .route(
            "/trackSharingClick",
            web::post().to(CallableService::track_sharing_click),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callable_status_mapping() {
        assert_eq!(
            callable_status(&SharelinkerError::unauthenticated("x")),
            (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED")
        );
        assert_eq!(
            callable_status(&SharelinkerError::invalid_argument("x")),
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
        );
        assert_eq!(
            callable_status(&SharelinkerError::internal("x")),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
        );
        assert_eq!(
            callable_status(&SharelinkerError::database_operation("x")).1,
            "INTERNAL"
        );
    }

    #[test]
    fn test_missing_identity_wins_over_bad_body() {
        let body: Result<web::Json<CallableRequest<CaptionRequest>>, actix_web::Error> =
            Err(actix_web::error::ErrorBadRequest("bad body"));
        let resp = authenticated_payload(None, body).unwrap_err();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bad_body_with_identity_keeps_its_error() {
        let caller = CallerIdentity::new("u1");
        let body: Result<web::Json<CallableRequest<CaptionRequest>>, actix_web::Error> =
            Err(actix_web::error::ErrorBadRequest("bad body"));
        let resp = authenticated_payload(Some(&caller), body).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
