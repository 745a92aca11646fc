use serde::{Deserialize, Serialize};

/// 认证设置，来自 simpleauth-settings.json 的 auth_settings 段
/// Auth settings, bound from the auth_settings section of simpleauth-settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleAuthSettings {
    /// 认证方案名
    pub authentication_scheme: String,
    /// 会话 Cookie 名
    pub cookie_name: String,
    /// 登录页路径（未认证挑战的跳转目标）
    pub login_path: String,
    /// 拒绝访问的跳转目标
    pub access_denied_path: String,
    /// 会话有效期（秒）
    pub session_timeout_seconds: i64,
    /// 是否允许明文密码（仅开发环境使用）
    /// Whether cleartext passwords are accepted (development only)
    pub allow_cleartext_passwords: bool,
}

impl Default for SimpleAuthSettings {
    fn default() -> Self {
        Self {
            authentication_scheme: "application".to_string(),
            cookie_name: "application".to_string(),
            login_path: "/login".to_string(),
            access_denied_path: "/".to_string(),
            session_timeout_seconds: 86400,
            allow_cleartext_passwords: false,
        }
    }
}

/// 配置文件中的用户记录，来自 users 段
/// A user record from the users section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleAuthUser {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    /// 明文密码，仅当 allow_cleartext_passwords 打开时生效
    #[serde(default)]
    pub password: Option<String>,
    /// argon2 PHC 格式哈希，由 hash-password 子命令生成
    /// argon2 PHC hash, produced by the hash-password subcommand
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl SimpleAuthUser {
    pub fn display_name_or_username(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_match_cookie_contract() {
        let s = SimpleAuthSettings::default();
        assert_eq!(s.cookie_name, "application");
        assert_eq!(s.authentication_scheme, "application");
        assert_eq!(s.login_path, "/login");
        assert_eq!(s.access_denied_path, "/");
    }

    #[test]
    fn test_user_deserializes_with_minimal_fields() {
        let u: SimpleAuthUser =
            serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert_eq!(u.username, "alice");
        assert!(u.roles.is_empty());
        assert_eq!(u.display_name_or_username(), "alice");
    }
}
