use actix_web::web;
use std::path::PathBuf;
use std::sync::Arc;

use content_center::auth::resolver::SimpleAuthSecurityResolver;
use content_center::auth::session::AuthState;
use content_center::auth::settings::SimpleAuthSettings;
use content_center::auth::user_store::UserStore;
use content_center::content::queries::{ConfigProjectQueries, ProjectQueries};
use content_center::content::storage::NoDbContentStore;
use content_center::files::manager::FileManagerService;
use content_center::nav::default_navigation;
use content_center::state::ContentState;

/// 整个测试进程共享同一个 Sa-Token 管理器
/// The whole test process shares one Sa-Token manager
pub async fn ensure_sa_token() {
    static INIT: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();
    INIT.get_or_init(|| async {
        content_center::auth::policy::configure_auth_policies();
        let settings = SimpleAuthSettings::default();
        content_center::conf::init_sa_token(&settings)
            .await
            .expect("sa-token 初始化失败");
    })
    .await;
}

pub struct TestEnv {
    pub auth_state: web::Data<AuthState>,
    pub content_state: web::Data<ContentState>,
    pub admin: String,
    pub reader: String,
    #[allow(dead_code)]
    pub root: PathBuf,
}

/// 每个测试一套独立目录与用户名，避免共享全局会话状态时互相干扰
/// A fresh directory set and usernames per test, so the shared global
/// session state does not bleed across tests
pub fn test_env(tag: &str) -> TestEnv {
    let root = std::env::temp_dir().join(format!(
        "content-center-it-{}-{}",
        tag,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).expect("创建测试目录失败");

    let admin = format!("admin-{}", tag);
    let reader = format!("reader-{}", tag);

    let auth_file = root.join("simpleauth-settings.json");
    std::fs::write(
        &auth_file,
        format!(
            r#"{{
  "auth_settings": {{ "allow_cleartext_passwords": true }},
  "users": [
    {{ "username": "{}", "display_name": "Admin", "password": "admin123", "roles": ["Administrators"] }},
    {{ "username": "{}", "display_name": "Reader", "password": "reader123", "roles": [] }}
  ]
}}"#,
            admin, reader
        ),
    )
    .expect("写入认证设置失败");

    let content_file = root.join("simplecontent-settings.json");
    std::fs::write(
        &content_file,
        r#"{
  "content_projects": [
    {
      "id": "default",
      "title": "Test Site",
      "description": "integration test project",
      "site_url": "http://localhost:3000",
      "posts_per_page": 5
    }
  ]
}"#,
    )
    .expect("写入内容设置失败");

    let users = Arc::new(UserStore::load(&auth_file).expect("加载用户存储失败"));
    let settings = users.settings();

    let projects: Arc<dyn ProjectQueries> =
        Arc::new(ConfigProjectQueries::load(&content_file).expect("加载项目设置失败"));
    let store = Arc::new(NoDbContentStore::new(root.join("content")));
    let files = Arc::new(FileManagerService::new(root.join("media")));
    let resolver = Arc::new(SimpleAuthSecurityResolver::new(users.clone()));

    TestEnv {
        auth_state: web::Data::new(AuthState {
            settings,
            users,
        }),
        content_state: web::Data::new(ContentState {
            projects,
            store,
            files,
            resolver,
            nav: default_navigation(),
        }),
        admin,
        reader,
        root,
    }
}

/// 按与生产 init_routes 一致的顺序注册全部路由
/// Register every route in the same order as the production init_routes
pub fn configure_all(cfg: &mut web::ServiceConfig) {
    content_center::modules::statics::register(cfg);
    content_center::modules::account::register(cfg);
    content_center::modules::home::register(cfg);
    content_center::modules::filemanager::register(cfg);
    content_center::modules::content_api::register(cfg);
    content_center::modules::feeds::register(cfg);
    content_center::modules::blog::register(cfg);
    content_center::modules::pages::register(cfg);
}
