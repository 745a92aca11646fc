use actix_web::{
    body::BoxBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use tracing::debug;

use crate::http::html_with_status;
use crate::nav::{default_navigation, NavNode};
use crate::state::ContentState;
use crate::views;

/// 状态码对应的错误页文案
pub fn status_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "The page you requested could not be found.",
        StatusCode::FORBIDDEN => "You are not allowed to access this resource.",
        StatusCode::UNAUTHORIZED => "Please sign in to access this resource.",
        StatusCode::BAD_REQUEST => "The request could not be understood.",
        s if s.is_server_error() => "Something went wrong while handling your request.",
        _ => "The request could not be completed.",
    }
}

/// 错误页中间件：非成功状态的页面响应按错误视图重新执行，
/// 原始状态码保留在响应上（404 仍然是 404）。
/// JSON 接口路径不改写，保持结构化错误体。
/// 开发环境不挂载这个中间件，直接暴露诊断输出。
/// Error pages middleware: non-success interactive responses re-execute
/// against the error view while the original status code stays on the wire
/// (a 404 remains a 404). API paths are left alone so their structured
/// error bodies survive. Development does not mount this middleware.
pub struct ErrorPages;

impl ErrorPages {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ErrorPages {
    fn default() -> Self {
        Self::new()
    }
}

/// 这些前缀的响应不改写
fn is_passthrough_path(path: &str) -> bool {
    path.starts_with("/api")
        || path.starts_with("/swagger-ui")
        || path.starts_with("/api-doc")
        || path.starts_with("/home/error")
}

impl<S> Transform<S, ServiceRequest> for ErrorPages
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = ErrorPagesService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorPagesService {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorPagesService<S> {
    service: Rc<S>,
}

impl<S> ErrorPagesService<S> {
    fn navigation(req: &actix_web::HttpRequest) -> Vec<NavNode> {
        req.app_data::<actix_web::web::Data<ContentState>>()
            .map(|state| state.nav.clone())
            .unwrap_or_else(default_navigation)
    }
}

impl<S> Service<ServiceRequest> for ErrorPagesService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let passthrough = is_passthrough_path(req.path());
        let http_req = req.request().clone();

        Box::pin(async move {
            match service.call(req).await {
                Ok(resp) => {
                    let status = resp.status();
                    if passthrough || !(status.is_client_error() || status.is_server_error()) {
                        return Ok(resp);
                    }
                    debug!("错误页重新执行: {} {}", status.as_u16(), http_req.path());
                    let nav = Self::navigation(&http_req);
                    let body = views::render_error_page(
                        status.as_u16(),
                        status_message(status),
                        &nav,
                    );
                    Ok(ServiceResponse::new(http_req, html_with_status(status, body)))
                }
                Err(err) => {
                    if passthrough {
                        return Err(err);
                    }
                    let status = err.as_response_error().status_code();
                    debug!(
                        "处理器错误改写为错误页: {} {} ({})",
                        status.as_u16(),
                        http_req.path(),
                        err
                    );
                    let nav = Self::navigation(&http_req);
                    let body = views::render_error_page(
                        status.as_u16(),
                        status_message(status),
                        &nav,
                    );
                    Ok(ServiceResponse::new(http_req, html_with_status(status, body)))
                }
            }
        })
    }
}
