use std::sync::Arc;

use crate::auth::resolver::ProjectSecurityResolver;
use crate::content::queries::ProjectQueries;
use crate::content::storage::NoDbContentStore;
use crate::files::manager::FileManagerService;
use crate::nav::NavNode;

/// 内容系统共享状态，启动时注入应用
/// Shared content-system state, injected into the app at bootstrap
pub struct ContentState {
    pub projects: Arc<dyn ProjectQueries>,
    pub store: Arc<NoDbContentStore>,
    pub files: Arc<FileManagerService>,
    /// 可插拔的项目安全解析器缝隙
    pub resolver: Arc<dyn ProjectSecurityResolver>,
    pub nav: Vec<NavNode>,
}
