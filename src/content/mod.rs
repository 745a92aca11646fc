/// 内容系统：配置定义的项目 + 文件存储的页面/文章
/// Content system: config-defined projects + file-backed pages/posts

pub mod model;
pub mod queries;
pub mod storage;

pub use model::{Page, Post, ProjectSettings};
pub use queries::{ConfigProjectQueries, ProjectQueries};
pub use storage::NoDbContentStore;
