// content-center 库主入口，按需导出模块

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod comm;
pub mod conf;
pub mod content;
pub mod error;
pub mod feed;
pub mod files;
pub mod http;
pub mod middleware;
pub mod modules;
pub mod nav;
pub mod state;
pub mod views;

pub use comm::config::{get_config, get_global_config_manager};
pub use comm::tracing::init_tracing;
pub use error::{AppError, AppResult};

// 重新导出 tracing 宏，方便模块内使用
// Re-export tracing macros for convenience
pub use tracing::{debug, error as log_error, info, trace, warn};

/// 注册全部模块路由
///
/// 注册顺序即匹配顺序：静态资源、账户、Home、文件管理、
/// 编辑接口、feed、博客，最后才是兜底的页面路由，
/// /login 这类路径先于 {slug} 被解析
/// Registration order is match order: statics, account, home, file
/// manager, edit APIs, feeds, blog, and only then the fallback page
/// routes, so paths like /login resolve before {slug}
pub fn init_routes() {
    crate::register_route!(
        "statics",
        "站点样式与媒体静态资源",
        "statics",
        modules::statics::register
    );
    crate::register_route!("account", "登录与登出", "account", modules::account::register);
    crate::register_route!("home", "Home 控制器与错误页", "home", modules::home::register);
    crate::register_route!(
        "filemanager",
        "媒体文件管理",
        "filemanager",
        modules::filemanager::register
    );
    crate::register_route!(
        "content-api",
        "页面与文章的 JSON 编辑接口",
        "content",
        modules::content_api::register
    );
    crate::register_route!("feeds", "RSS 与站点地图", "feeds", modules::feeds::register);
    crate::register_route!("blog", "博客索引与文章页", "content", modules::blog::register);
    // 兜底路由必须最后注册 / the fallback must come last
    crate::register_route!("pages", "站点根与内容页面", "content", modules::pages::register);
}
