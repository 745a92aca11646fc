use actix_web::{
    http::header::HeaderName, http::header::HeaderValue, http::StatusCode, HttpResponse,
};
use serde::Serialize;

pub fn json_ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

/// 303 跳转，用于登录挑战与拒绝访问重定向
/// 303 redirect, used for login challenge and access-denied redirects
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, location.to_string()))
        .finish()
}

/// 带头部的文本响应（feed 输出使用）
/// Text body with headers (used by feed output)
pub fn body_with_headers(
    status: StatusCode,
    content_type: &str,
    body: String,
    headers: &[(&str, &str)],
) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    builder.content_type(content_type.to_string());
    for (k, v) in headers {
        let name =
            HeaderName::from_lowercase(k.as_bytes()).unwrap_or(HeaderName::from_static("x-invalid"));
        let value = HeaderValue::from_str(v).unwrap_or(HeaderValue::from_static(""));
        builder.insert_header((name, value));
    }
    builder.body(body)
}

/// HTML 响应
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// 指定状态码的 HTML 响应（错误页保留原状态码）
/// HTML body with an explicit status (error pages keep the original status)
pub fn html_with_status(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}
