use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use crate::comm::config::get_global_config_manager;
use crate::content::model::ProjectSettings;

/// 项目查询接口：内容控制器只依赖这个抽象
/// Project queries seam: content controllers depend on this abstraction only
#[async_trait]
pub trait ProjectQueries: Send + Sync {
    async fn get_project(&self, project_id: &str) -> Option<ProjectSettings>;
    async fn list_projects(&self) -> Vec<ProjectSettings>;

    /// 默认项目：列表第一个，没有配置时给内置默认
    async fn default_project(&self) -> ProjectSettings {
        self.list_projects()
            .await
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

/// simplecontent-settings.json 的文件形状
#[derive(Debug, Default, Deserialize)]
struct ContentSettingsFile {
    #[serde(default)]
    content_projects: Vec<ProjectSettings>,
}

struct Inner {
    projects: Vec<ProjectSettings>,
    mtime: Option<SystemTime>,
}

/// 配置驱动的项目查询：项目设置来自 simplecontent-settings.json，
/// 按修改时间热加载
/// Config-backed project queries: settings come from
/// simplecontent-settings.json, hot-reloaded on modification time change
pub struct ConfigProjectQueries {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl ConfigProjectQueries {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match Self::read_file(&path)? {
            Some(inner) => inner,
            None => Self::read_from_config()?,
        };
        tracing::info!("内容项目已加载: {} 个", inner.projects.len());
        Ok(Self {
            path,
            inner: RwLock::new(inner),
        })
    }

    fn read_file(path: &Path) -> Result<Option<Inner>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("读取 {} 失败: {}", path.display(), e))?;
        let parsed: ContentSettingsFile = serde_json::from_str(&raw)
            .map_err(|e| anyhow!("解析 {} 失败: {}", path.display(), e))?;
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        Ok(Some(Inner {
            projects: parsed.content_projects,
            mtime,
        }))
    }

    fn read_from_config() -> Result<Inner> {
        let mgr = get_global_config_manager()?;
        let projects: Vec<ProjectSettings> = mgr.get("content_projects").unwrap_or_default();
        Ok(Inner {
            projects,
            mtime: None,
        })
    }

    fn maybe_reload(&self) {
        let current_mtime = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok();
        let stale = {
            let inner = self.inner.read().unwrap();
            current_mtime.is_some() && current_mtime != inner.mtime
        };
        if !stale {
            return;
        }
        match Self::read_file(&self.path) {
            Ok(Some(fresh)) => {
                let mut inner = self.inner.write().unwrap();
                tracing::info!(
                    "检测到 {} 变更，重新加载 {} 个项目",
                    self.path.display(),
                    fresh.projects.len()
                );
                *inner = fresh;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("重新加载内容项目失败，保留旧数据: {}", e);
            }
        }
    }
}

#[async_trait]
impl ProjectQueries for ConfigProjectQueries {
    async fn get_project(&self, project_id: &str) -> Option<ProjectSettings> {
        self.maybe_reload();
        self.inner
            .read()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
    }

    async fn list_projects(&self) -> Vec<ProjectSettings> {
        self.maybe_reload();
        self.inner.read().unwrap().projects.clone()
    }
}
