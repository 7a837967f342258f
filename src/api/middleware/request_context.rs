//! 请求上下文中间件
//!
//! 为每个请求生成 request_id，并解析 `Authorization` 头中的调用方身份。
//! 身份（若有效）以 [`CallerIdentity`] 存入 request extensions，
//! handler 通过 `Option<web::ReqData<CallerIdentity>>` 读取。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{Instrument, info_span, trace};
use uuid::Uuid;

use crate::api::identity::{CallerIdentity, IdentityVerifier};

/// 请求 ID，可从 request extensions 中提取
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// 中间件工厂
#[derive(Clone)]
pub struct RequestContext {
    verifier: Arc<IdentityVerifier>,
}

impl RequestContext {
    pub fn new(verifier: Arc<IdentityVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct RequestContextService<S> {
    service: Rc<S>,
    verifier: Arc<IdentityVerifier>,
}

impl<S, B> Service<ServiceRequest> for RequestContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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

        let request_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let identity: Option<CallerIdentity> = self.verifier.verify_header(
            req.headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
        );
        let caller = identity
            .as_ref()
            .map(|i| i.uid.clone())
            .unwrap_or_else(|| "-".to_string());
        if let Some(identity) = identity {
            req.extensions_mut().insert(identity);
        }

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
            caller = %caller,
        );

        Box::pin(
            async move {
                trace!("Request started");
                let mut response = srv.call(req).await?;

                if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static("x-request-id"), header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
