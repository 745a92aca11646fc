/// 启动与注册模块
pub mod app_bootstrap;
pub mod route_registry;

pub use app_bootstrap::{AppBootstrap, AppConfig};
