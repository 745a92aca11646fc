/// 中间件模块
pub mod error_pages;

pub use error_pages::ErrorPages;
