use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use crate::http::{html_with_status, see_other};
use crate::middleware::error_pages::status_message;
use crate::state::ContentState;
use crate::views;

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/home/index").route(web::get().to(index)));
    cfg.service(web::resource("/home/error").route(web::get().to(error_default)));
    cfg.service(web::resource("/home/error/{status}").route(web::get().to(error_with_status)));
}

/// 内容路由接管了站点根，Home/Index 只做回跳
/// The content routes own the site root, Home/Index just redirects back
async fn index() -> HttpResponse {
    see_other("/")
}

async fn error_default(state: web::Data<ContentState>) -> HttpResponse {
    render_error(StatusCode::INTERNAL_SERVER_ERROR, &state)
}

/// 通用错误页，路径里的状态码原样保留在响应上
/// Generic error page, the status code from the path is kept on the response
async fn error_with_status(
    path: web::Path<u16>,
    state: web::Data<ContentState>,
) -> HttpResponse {
    let status =
        StatusCode::from_u16(path.into_inner()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    render_error(status, &state)
}

fn render_error(status: StatusCode, state: &ContentState) -> HttpResponse {
    let body = views::render_error_page(status.as_u16(), status_message(status), &state.nav);
    html_with_status(status, body)
}
