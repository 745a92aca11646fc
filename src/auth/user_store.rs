use anyhow::{anyhow, Result};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use crate::auth::settings::{SimpleAuthSettings, SimpleAuthUser};
use crate::comm::config::get_global_config_manager;

/// simpleauth-settings.json 的文件形状
#[derive(Debug, Default, Deserialize)]
struct AuthSettingsFile {
    #[serde(default)]
    auth_settings: SimpleAuthSettings,
    #[serde(default)]
    users: Vec<SimpleAuthUser>,
}

struct Inner {
    settings: SimpleAuthSettings,
    users: Vec<SimpleAuthUser>,
    mtime: Option<SystemTime>,
}

/// 用户存储：用户与认证设置来自配置文件，按修改时间热加载
/// User store: users and auth settings come from the settings file,
/// hot-reloaded on modification time change
pub struct UserStore {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl UserStore {
    /// 从设置文件加载；文件不存在时回退到合并配置树的对应段
    /// Load from the settings file; falls back to the merged config tree
    /// sections when the file is absent
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match Self::read_file(&path)? {
            Some(inner) => inner,
            None => Self::read_from_config()?,
        };
        tracing::info!(
            "用户存储已加载: {} 个用户, cookie={}",
            inner.users.len(),
            inner.settings.cookie_name
        );
        Ok(Self {
            path,
            inner: RwLock::new(inner),
        })
    }

    fn read_file(path: &Path) -> Result<Option<Inner>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("读取 {} 失败: {}", path.display(), e))?;
        let parsed: AuthSettingsFile = serde_json::from_str(&raw)
            .map_err(|e| anyhow!("解析 {} 失败: {}", path.display(), e))?;
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        Ok(Some(Inner {
            settings: parsed.auth_settings,
            users: parsed.users,
            mtime,
        }))
    }

    fn read_from_config() -> Result<Inner> {
        let mgr = get_global_config_manager()?;
        let settings: SimpleAuthSettings =
            mgr.get("auth_settings").unwrap_or_default();
        let users: Vec<SimpleAuthUser> = mgr.get("users").unwrap_or_default();
        Ok(Inner {
            settings,
            users,
            mtime: None,
        })
    }

    /// 文件变更时重新加载（按 mtime 判断）
    fn maybe_reload(&self) {
        let current_mtime = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok();
        let stale = {
            let inner = self.inner.read().unwrap();
            current_mtime.is_some() && current_mtime != inner.mtime
        };
        if !stale {
            return;
        }
        match Self::read_file(&self.path) {
            Ok(Some(fresh)) => {
                let mut inner = self.inner.write().unwrap();
                tracing::info!(
                    "检测到 {} 变更，重新加载 {} 个用户",
                    self.path.display(),
                    fresh.users.len()
                );
                *inner = fresh;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("重新加载用户存储失败，保留旧数据: {}", e);
            }
        }
    }

    pub fn settings(&self) -> SimpleAuthSettings {
        self.maybe_reload();
        self.inner.read().unwrap().settings.clone()
    }

    pub fn find_user(&self, username: &str) -> Option<SimpleAuthUser> {
        self.maybe_reload();
        self.inner
            .read()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    /// 校验用户名密码，成功时返回用户记录
    /// Validate credentials, returning the user record on success
    pub fn validate_credentials(&self, username: &str, password: &str) -> Option<SimpleAuthUser> {
        let user = self.find_user(username)?;
        let settings = self.settings();

        if let Some(ref hash) = user.password_hash {
            if verify_password(hash, password) {
                return Some(user);
            }
            return None;
        }
        if settings.allow_cleartext_passwords {
            if let Some(ref cleartext) = user.password {
                if !cleartext.is_empty() && cleartext == password {
                    return Some(user);
                }
            }
        }
        None
    }
}

/// 校验 argon2 PHC 哈希
pub fn verify_password(phc_hash: &str, password: &str) -> bool {
    match PasswordHash::new(phc_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// 生成 argon2 PHC 哈希（hash-password 子命令使用）
/// Produce an argon2 PHC hash (used by the hash-password subcommand)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow!("密码哈希失败: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password(&hash, "s3cret"));
        assert!(!verify_password(&hash, "wrong"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    fn store_with(users_json: &str, allow_cleartext: bool) -> UserStore {
        let inner = Inner {
            settings: SimpleAuthSettings {
                allow_cleartext_passwords: allow_cleartext,
                ..Default::default()
            },
            users: serde_json::from_str(users_json).unwrap(),
            mtime: None,
        };
        UserStore {
            path: PathBuf::from("does-not-exist.json"),
            inner: RwLock::new(inner),
        }
    }

    #[test]
    fn test_cleartext_only_honored_when_allowed() {
        let users = r#"[{"username": "admin", "password": "admin123", "roles": ["Administrators"]}]"#;

        let permissive = store_with(users, true);
        assert!(permissive.validate_credentials("admin", "admin123").is_some());
        assert!(permissive.validate_credentials("admin", "nope").is_none());

        let strict = store_with(users, false);
        assert!(strict.validate_credentials("admin", "admin123").is_none());
    }

    #[test]
    fn test_username_lookup_is_case_insensitive() {
        let users = r#"[{"username": "Admin", "password": "pw"}]"#;
        let store = store_with(users, true);
        assert!(store.find_user("admin").is_some());
        assert!(store.validate_credentials("ADMIN", "pw").is_some());
    }

    #[test]
    fn test_hashed_password_wins_over_cleartext() {
        let hash = hash_password("real").unwrap();
        let users = format!(
            r#"[{{"username": "bob", "password": "fake", "password_hash": "{}"}}]"#,
            hash
        );
        let store = store_with(&users, true);
        // 有哈希时忽略明文字段 / cleartext field is ignored once a hash exists
        assert!(store.validate_credentials("bob", "real").is_some());
        assert!(store.validate_credentials("bob", "fake").is_none());
    }
}
