/// HTTP 辅助模块：响应工具、缓存配置
/// HTTP helpers: response utilities, cache profiles

pub mod actix_ext;
pub mod cache;

pub use actix_ext::*;
pub use cache::*;
