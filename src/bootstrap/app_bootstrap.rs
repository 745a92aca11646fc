use actix_web::{middleware::Condition, middleware::Logger, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::resolver::SimpleAuthSecurityResolver;
use crate::auth::session::AuthState;
use crate::auth::user_store::UserStore;
use crate::auth::policy::configure_auth_policies;
use crate::bootstrap::route_registry::{configure_global_routes, print_global_routes_info};
use crate::comm::config::{get_global_config_manager, is_development};
use crate::conf::init_sa_token;
use crate::content::queries::{ConfigProjectQueries, ProjectQueries};
use crate::content::storage::NoDbContentStore;
use crate::error::{AppError, AppResult};
use crate::files::manager::FileManagerService;
use crate::middleware::ErrorPages;
use crate::nav::load_navigation;
use crate::state::ContentState;
use sa_token_plugin_actix_web::SaTokenState;

const AUTH_SETTINGS_FILE: &str = "config/simpleauth-settings.json";
const CONTENT_SETTINGS_FILE: &str = "config/simplecontent-settings.json";

/// 应用配置结构体
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub development: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            workers: None,
            development: false,
        }
    }
}

impl AppConfig {
    /// 从合并配置树读取 server 段
    pub fn from_config() -> AppResult<Self> {
        let mgr = get_global_config_manager().map_err(AppError::Internal)?;
        Ok(Self {
            host: mgr.get_or("server.host", "0.0.0.0".to_string()),
            port: mgr.get_or("server.port", 3000_i64) as u16,
            workers: mgr
                .get::<i64>("server.workers")
                .ok()
                .filter(|w| *w > 0)
                .map(|w| w as usize),
            development: is_development(),
        })
    }
}

/// 应用启动器：组合根。加载配置、初始化会话管理器、
/// 注册授权策略、装配共享状态、声明中间件管道并启动服务
/// Application bootstrap: the composition root. Loads configuration,
/// initializes the session manager, registers authorization policies,
/// assembles the shared state, declares the middleware pipeline and runs
pub struct AppBootstrap {
    config: Option<AppConfig>,
}

impl AppBootstrap {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub async fn run(self) -> AppResult<()> {
        let config = self.config.clone().unwrap_or_default();
        info!("启动应用服务器，配置: {:?}", config);

        let config_manager = get_global_config_manager().map_err(AppError::Internal)?;
        config_manager.print_sources_info();

        // 用户存储与认证设置（simpleauth-settings.json，支持热加载）
        let users = Arc::new(UserStore::load(AUTH_SETTINGS_FILE).map_err(AppError::Internal)?);
        let auth_settings = users.settings();

        // 初始化 Sa-Token 会话管理器
        let sa_token_manager = init_sa_token(&auth_settings)
            .await
            .map_err(|e| AppError::external_service("sa-token", e.to_string()))?;
        let sa_token_state = SaTokenState {
            manager: sa_token_manager.clone(),
        };
        let sa_token_data = web::Data::new(sa_token_state.clone());

        // 授权策略表
        configure_auth_policies();

        // 内容项目（simplecontent-settings.json，支持热加载）与文件存储
        let projects: Arc<dyn ProjectQueries> = Arc::new(
            ConfigProjectQueries::load(CONTENT_SETTINGS_FILE).map_err(AppError::Internal)?,
        );
        let content_root: String =
            config_manager.get_or("content.root_path", "./content".to_string());
        let store = Arc::new(NoDbContentStore::new(&content_root));

        let default_project = projects.default_project().await;
        let media_root = PathBuf::from(&content_root)
            .join(&default_project.id)
            .join(&default_project.media_folder);
        let files = Arc::new(FileManagerService::new(media_root));

        // 安全解析器缝隙：默认绑定 SimpleAuth 实现，
        // 换认证后端时在这里替换注册的实现
        // Security resolver seam: the SimpleAuth-backed implementation is
        // registered here; a different auth backend swaps this registration
        let resolver = Arc::new(SimpleAuthSecurityResolver::new(users.clone()));

        let content_state = web::Data::new(ContentState {
            projects,
            store,
            files,
            resolver,
            nav: load_navigation(),
        });
        let auth_state = web::Data::new(AuthState {
            settings: auth_settings,
            users,
        });

        print_global_routes_info();

        let use_error_pages = !config.development;
        if config.development {
            info!("开发环境：不挂载错误页中间件，直接返回诊断响应");
        }

        let mut server = HttpServer::new(move || {
            App::new()
                .app_data(sa_token_data.clone())
                .app_data(auth_state.clone())
                .app_data(content_state.clone())
                // 错误页在路由之外、日志之内 / error pages outside routes, inside the logger
                .wrap(Condition::new(use_error_pages, ErrorPages::new()))
                .wrap(Logger::default())
                // Swagger UI 文档（JSON 编辑接口）
                .service(SwaggerUi::new("/swagger-ui/{_:.*}").url(
                    "/api-doc/openapi.json",
                    crate::api::swagger::ApiDoc::openapi(),
                ))
                // 配置全局路由（注册顺序即匹配顺序）
                .configure(configure_global_routes)
        });
        if let Some(workers) = config.workers {
            server = server.workers(workers);
        }

        let addr = format!("{}:{}", config.host, config.port);
        info!("服务器将在 {} 上启动", addr);

        server
            .bind(&addr)
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?
            .run()
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

        Ok(())
    }
}

impl Default for AppBootstrap {
    fn default() -> Self {
        Self::new()
    }
}
