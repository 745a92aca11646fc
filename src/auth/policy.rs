use actix_web::HttpResponse;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::auth::session::{is_in_role, CurrentUser};
use crate::auth::settings::SimpleAuthSettings;
use crate::error::{AppError, AppResult};
use crate::http::see_other;

/// 博客编辑策略
pub const BLOG_EDIT_POLICY: &str = "BlogEditPolicy";
/// 页面编辑策略
pub const PAGE_EDIT_POLICY: &str = "PageEditPolicy";
/// 文件管理策略
pub const FILE_MANAGER_POLICY: &str = "FileManagerPolicy";
/// 文件删除策略
pub const FILE_MANAGER_DELETE_POLICY: &str = "FileManagerDeletePolicy";

/// 管理员角色名
pub const ROLE_ADMINISTRATORS: &str = "Administrators";

lazy_static! {
    static ref POLICY_REGISTRY: RwLock<HashMap<String, Vec<String>>> =
        RwLock::new(HashMap::new());
}

/// 注册命名策略：满足所列任一角色即授权
/// Register a named policy: any of the listed roles grants it
pub fn register_policy(name: &str, required_roles: &[&str]) {
    let mut registry = POLICY_REGISTRY.write().unwrap();
    registry.insert(
        name.to_string(),
        required_roles.iter().map(|r| r.to_string()).collect(),
    );
}

/// 注册应用的授权策略表
///
/// 当前是单层模型：四个策略都要求 Administrators 角色，
/// 多租户的按项目授权需要更细的模型
/// Flat single-tier model: all four policies require the Administrators
/// role; per-project multi-tenant authorization would need a finer model
pub fn configure_auth_policies() {
    register_policy(BLOG_EDIT_POLICY, &[ROLE_ADMINISTRATORS]);
    register_policy(PAGE_EDIT_POLICY, &[ROLE_ADMINISTRATORS]);
    register_policy(FILE_MANAGER_POLICY, &[ROLE_ADMINISTRATORS]);
    register_policy(FILE_MANAGER_DELETE_POLICY, &[ROLE_ADMINISTRATORS]);
}

pub fn required_roles(policy_name: &str) -> Option<Vec<String>> {
    POLICY_REGISTRY.read().unwrap().get(policy_name).cloned()
}

/// 策略判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// 授权通过
    Granted,
    /// 未认证，需要登录挑战
    Challenge,
    /// 已认证但缺少所需角色
    Denied,
}

/// 按命名策略判定当前用户
pub async fn authorize(user: Option<&CurrentUser>, policy_name: &str) -> PolicyDecision {
    let Some(user) = user else {
        return PolicyDecision::Challenge;
    };
    let Some(roles) = required_roles(policy_name) else {
        tracing::warn!("未注册的授权策略: {}", policy_name);
        return PolicyDecision::Denied;
    };
    for role in roles {
        if is_in_role(&user.username, &role).await {
            return PolicyDecision::Granted;
        }
    }
    PolicyDecision::Denied
}

/// JSON 接口的策略执行：未认证 401，缺角色 403
/// Policy enforcement for JSON APIs: 401 unauthenticated, 403 missing role
pub async fn enforce_api(user: Option<&CurrentUser>, policy_name: &str) -> AppResult<()> {
    match authorize(user, policy_name).await {
        PolicyDecision::Granted => Ok(()),
        PolicyDecision::Challenge => Err(AppError::auth("需要登录")),
        PolicyDecision::Denied => Err(AppError::permission(format!(
            "缺少策略 {} 所需的角色",
            policy_name
        ))),
    }
}

/// 页面请求的策略执行：未认证跳登录页并带上原路径，
/// 缺角色跳拒绝访问页
/// Policy enforcement for interactive requests: challenge redirects to the
/// login path carrying the original path, denial redirects to the
/// access-denied path
pub async fn enforce_interactive(
    user: Option<&CurrentUser>,
    policy_name: &str,
    settings: &SimpleAuthSettings,
    request_path: &str,
) -> Result<(), HttpResponse> {
    match authorize(user, policy_name).await {
        PolicyDecision::Granted => Ok(()),
        PolicyDecision::Challenge => Err(see_other(&format!(
            "{}?return_url={}",
            settings.login_path,
            urlencoding::encode(request_path)
        ))),
        PolicyDecision::Denied => Err(see_other(&settings.access_denied_path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table_registration() {
        configure_auth_policies();
        for name in [
            BLOG_EDIT_POLICY,
            PAGE_EDIT_POLICY,
            FILE_MANAGER_POLICY,
            FILE_MANAGER_DELETE_POLICY,
        ] {
            let roles = required_roles(name).expect("policy registered");
            assert_eq!(roles, vec![ROLE_ADMINISTRATORS.to_string()]);
        }
    }

    #[tokio::test]
    async fn test_anonymous_gets_challenge() {
        configure_auth_policies();
        assert_eq!(
            authorize(None, BLOG_EDIT_POLICY).await,
            PolicyDecision::Challenge
        );
    }

    #[tokio::test]
    async fn test_unknown_policy_denies() {
        let user = CurrentUser {
            username: "someone".to_string(),
            display_name: "someone".to_string(),
            token: "t".to_string(),
        };
        assert_eq!(
            authorize(Some(&user), "NoSuchPolicy").await,
            PolicyDecision::Denied
        );
    }
}
