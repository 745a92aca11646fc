use actix_web::cookie::Cookie;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sa_token_core::TokenValue;
use sa_token_plugin_actix_web::StpUtil;
use serde_json::json;
use std::sync::Arc;

use crate::auth::settings::{SimpleAuthSettings, SimpleAuthUser};
use crate::auth::user_store::UserStore;
use crate::error::{AppError, AppResult};

/// 注入到应用状态的认证上下文
/// Auth context injected into application state
#[derive(Clone)]
pub struct AuthState {
    pub settings: SimpleAuthSettings,
    pub users: Arc<UserStore>,
}

/// 当前登录用户
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub display_name: String,
    /// 会话令牌（登出时销毁用）
    pub token: String,
}

/// 可选的当前用户：匿名请求时为 None
/// Optional current user: None for anonymous requests
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let cookie_name = req
            .app_data::<actix_web::web::Data<AuthState>>()
            .map(|s| s.settings.cookie_name.clone())
            .unwrap_or_else(|| SimpleAuthSettings::default().cookie_name);
        let display_lookup = req
            .app_data::<actix_web::web::Data<AuthState>>()
            .map(|s| s.users.clone());
        let token = req.cookie(&cookie_name).map(|c| c.value().to_string());

        Box::pin(async move {
            let Some(token) = token else {
                return Ok(MaybeUser(None));
            };
            if token.is_empty() || !StpUtil::is_login(&TokenValue::new(token.as_str())).await {
                return Ok(MaybeUser(None));
            }
            let login_id = match StpUtil::get_login_id(&TokenValue::new(token.as_str())).await {
                Ok(id) => id.to_string(),
                Err(_) => return Ok(MaybeUser(None)),
            };
            let display_name = display_lookup
                .and_then(|users| users.find_user(&login_id))
                .map(|u| u.display_name_or_username().to_string())
                .unwrap_or_else(|| login_id.clone());
            Ok(MaybeUser(Some(CurrentUser {
                username: login_id,
                display_name,
                token,
            })))
        })
    }
}

/// 登录：创建会话并写入角色，返回 Cookie 值
/// Sign in: create the session, record roles, return the cookie value
pub async fn sign_in(user: &SimpleAuthUser) -> AppResult<String> {
    let token = StpUtil::builder(&user.username)
        .extra_data(json!({ "display_name": user.display_name_or_username() }))
        .device("web")
        .login_type("cookie")
        .login(Some(user.username.clone()))
        .await
        .map_err(|e| AppError::auth(format!("登录失败: {}", e)))?;

    StpUtil::set_roles(&user.username, user.roles.clone())
        .await
        .map_err(|e| AppError::auth(format!("写入角色失败: {}", e)))?;

    Ok(token.to_string())
}

/// 登出：销毁会话
pub async fn sign_out(token: &str) {
    if let Err(e) = StpUtil::logout(&TokenValue::new(token)).await {
        tracing::debug!("登出时会话已失效: {}", e);
    }
}

/// 当前用户是否具有指定角色
pub async fn is_in_role(username: &str, role: &str) -> bool {
    StpUtil::has_role(username, role).await
}

/// 构造会话 Cookie（HttpOnly，站点全路径）
/// Build the session cookie (HttpOnly, site-wide path)
pub fn build_auth_cookie<'a>(settings: &SimpleAuthSettings, token: &'a str) -> Cookie<'a> {
    Cookie::build(settings.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .finish()
}

/// 构造清除会话 Cookie
pub fn build_removal_cookie(settings: &SimpleAuthSettings) -> Cookie<'static> {
    Cookie::build(settings.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .finish()
}
