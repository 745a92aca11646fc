use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::session::{
    build_auth_cookie, build_removal_cookie, sign_in, sign_out, AuthState, MaybeUser,
};
use crate::error::AppResult;
use crate::http::{html, see_other};
use crate::state::ContentState;
use crate::views::{self, PageContext};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub return_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub return_url: Option<String>,
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_form))
            .route(web::post().to(login_submit)),
    );
    cfg.service(
        web::resource("/logout")
            .route(web::get().to(logout))
            .route(web::post().to(logout)),
    );
}

/// 只接受站内相对路径，防止开放跳转
/// Only same-site relative paths, guards against open redirects
fn sanitize_return_url(raw: Option<String>) -> String {
    match raw {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url,
        _ => "/".to_string(),
    }
}

async fn login_form(
    user: MaybeUser,
    query: web::Query<LoginQuery>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    if user.is_authenticated() {
        return Ok(see_other("/"));
    }
    let ctx = PageContext {
        title: "Sign in",
        meta_description: "",
        nav: &state.nav,
        user: None,
        copyright: None,
    };
    let body = views::render_in_layout(
        "login",
        &json!({ "return_url": query.into_inner().return_url }),
        &ctx,
    )?;
    Ok(html(body))
}

async fn login_submit(
    form: web::Form<LoginForm>,
    auth: web::Data<AuthState>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let target = sanitize_return_url(form.return_url.clone());

    match auth.users.validate_credentials(&form.username, &form.password) {
        Some(user) => {
            let token = sign_in(&user).await?;
            tracing::info!("登录成功: {}", user.username);
            Ok(HttpResponse::SeeOther()
                .insert_header((actix_web::http::header::LOCATION, target))
                .cookie(build_auth_cookie(&auth.settings, &token))
                .finish())
        }
        None => {
            tracing::info!("登录失败: {}", form.username);
            let ctx = PageContext {
                title: "Sign in",
                meta_description: "",
                nav: &state.nav,
                user: None,
                copyright: None,
            };
            let body = views::render_in_layout(
                "login",
                &json!({
                    "error": "Invalid username or password",
                    "return_url": form.return_url,
                }),
                &ctx,
            )?;
            Ok(html(body))
        }
    }
}

async fn logout(user: MaybeUser, auth: web::Data<AuthState>) -> HttpResponse {
    if let Some(current) = user.0 {
        sign_out(&current.token).await;
    }
    let mut resp = see_other("/");
    let _ = resp.add_removal_cookie(&build_removal_cookie(&auth.settings));
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_return_url() {
        assert_eq!(sanitize_return_url(Some("/blog".to_string())), "/blog");
        assert_eq!(sanitize_return_url(None), "/");
        // 外部地址与协议相对地址都回落到根 / external and scheme-relative fall back to root
        assert_eq!(
            sanitize_return_url(Some("https://evil.example".to_string())),
            "/"
        );
        assert_eq!(sanitize_return_url(Some("//evil.example".to_string())), "/");
    }
}
