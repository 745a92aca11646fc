use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::files::manager::content_type_for;
use crate::state::ContentState;

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/static/site.css").route(web::get().to(site_css)));
    cfg.service(web::resource("/media/{name}").route(web::get().to(media_file)));
}

/// 站点样式表，编译期内嵌
/// Site stylesheet, embedded at compile time
async fn site_css() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(include_str!("../views/assets/site.css"))
}

/// 媒体静态资源，从文件管理器的根目录读取
/// Media static resources, read from the file manager root
async fn media_file(
    path: web::Path<String>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    let bytes = state
        .files
        .read(&name)?
        .ok_or_else(|| AppError::not_found(format!("media '{}'", name)))?;
    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&name))
        .body(bytes))
}
