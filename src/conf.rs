//! Sa-Token 配置初始化
//! Sa-Token Configuration Initialization

use anyhow::Result;
use sa_token_core::config::TokenStyle;
use sa_token_core::LoggingListener;
use sa_token_core::{SaTokenConfig, SaTokenManager};
use sa_token_storage_memory::MemoryStorage;
use std::sync::Arc;

use crate::auth::settings::SimpleAuthSettings;
use crate::comm::AuthEventListener;

/// 初始化 Sa-Token
/// Initialize Sa-Token
///
/// 令牌名取认证 Cookie 名（application），会话有效期来自认证设置；
/// 单进程部署，使用内存存储
/// The token name follows the auth cookie name (application), session
/// timeout comes from the auth settings; single-process deployment uses
/// the memory storage
pub async fn init_sa_token(settings: &SimpleAuthSettings) -> Result<Arc<SaTokenManager>> {
    let config_builder = SaTokenConfig::builder()
        .register_listener(Arc::new(AuthEventListener))
        .register_listener(Arc::new(LoggingListener))
        .token_name(settings.cookie_name.clone())
        .timeout(settings.session_timeout_seconds)
        .token_style(TokenStyle::Random64)
        .auto_renew(true)
        .storage(Arc::new(MemoryStorage::new()));

    let manager = config_builder.build();

    tracing::info!(
        "sa-token initialized: token={} timeout={}s storage=memory",
        settings.cookie_name,
        settings.session_timeout_seconds
    );

    Ok(Arc::new(manager))
}
