use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::policy::ROLE_ADMINISTRATORS;
use crate::auth::user_store::UserStore;

/// 项目级安全判定结果
/// Project-level security decision
#[derive(Debug, Clone, Default)]
pub struct ProjectSecurityResult {
    pub is_authenticated: bool,
    pub display_name: String,
    pub can_edit_pages: bool,
    pub can_edit_posts: bool,
}

impl ProjectSecurityResult {
    pub fn denied() -> Self {
        Self::default()
    }
}

/// 项目安全解析器：内容系统通过这个缝隙询问
/// “这个用户能否编辑/查看这个项目”，而不关心背后是哪套认证
/// Project security resolver: the seam through which the content system
/// asks "may this user edit/view this project" without knowing which
/// authentication backend answers
#[async_trait]
pub trait ProjectSecurityResolver: Send + Sync {
    async fn resolve(
        &self,
        username: &str,
        password: &str,
        project_id: &str,
    ) -> ProjectSecurityResult;
}

/// 基于配置用户存储的默认实现；换认证后端时替换注册的实现即可，
/// 路由与控制器不需要改动
/// Default implementation over the config user store; swapping the auth
/// backend means registering a different implementation, routing and
/// controllers stay untouched
pub struct SimpleAuthSecurityResolver {
    users: Arc<UserStore>,
}

impl SimpleAuthSecurityResolver {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl ProjectSecurityResolver for SimpleAuthSecurityResolver {
    async fn resolve(
        &self,
        username: &str,
        password: &str,
        _project_id: &str,
    ) -> ProjectSecurityResult {
        let Some(user) = self.users.validate_credentials(username, password) else {
            return ProjectSecurityResult::denied();
        };
        // 单层模型：编辑权限等同于管理员角色
        let is_admin = user.has_role(ROLE_ADMINISTRATORS);
        ProjectSecurityResult {
            is_authenticated: true,
            display_name: user.display_name_or_username().to_string(),
            can_edit_pages: is_admin,
            can_edit_posts: is_admin,
        }
    }
}
