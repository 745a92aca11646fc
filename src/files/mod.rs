/// 文件管理模块
pub mod manager;

pub use manager::{FileManagerService, MediaFile};
