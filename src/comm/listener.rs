use async_trait::async_trait;
use sa_token_core::SaTokenListener;

/// 会话事件监听器：把登录/登出事件写入日志
/// Session event listener: writes sign-in/sign-out events to the log
pub struct AuthEventListener;

#[async_trait]
impl SaTokenListener for AuthEventListener {
    async fn on_login(&self, login_id: &str, _token: &str, login_type: &str) {
        tracing::info!("用户 {} 登录 ({})", login_id, login_type);
    }

    async fn on_logout(&self, login_id: &str, _token: &str, _login_type: &str) {
        tracing::info!("用户 {} 登出", login_id);
    }

    async fn on_kick_out(&self, login_id: &str, _token: &str, _login_type: &str) {
        tracing::warn!("用户 {} 被踢出下线", login_id);
    }
}
