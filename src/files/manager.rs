use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 媒体文件条目
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaFile {
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// 文件管理器：列出、上传、删除媒体目录下的文件。
/// 所有操作都被限制在媒体根目录之内
/// File manager: list, upload and delete files under the media folder.
/// Every operation is confined to the media root
pub struct FileManagerService {
    media_root: PathBuf,
}

impl FileManagerService {
    pub fn new<P: AsRef<Path>>(media_root: P) -> Self {
        Self {
            media_root: media_root.as_ref().to_path_buf(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// 校验文件名：单段、无目录成分
    /// Validate a file name: single segment, no directory components
    fn safe_path(&self, name: &str) -> AppResult<PathBuf> {
        if name.is_empty() || name.starts_with('.') {
            return Err(AppError::validation("name", "非法的文件名"));
        }
        let candidate = Path::new(name);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(AppError::validation("name", "文件名不能包含路径")),
        }
        Ok(self.media_root.join(name))
    }

    pub fn list(&self) -> AppResult<Vec<MediaFile>> {
        let mut files = Vec::new();
        if !self.media_root.exists() {
            return Ok(files);
        }
        let entries = std::fs::read_dir(&self.media_root)
            .map_err(|e| AppError::storage(format!("枚举媒体目录失败: {}", e)))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let meta = entry
                .metadata()
                .map_err(|e| AppError::storage(format!("读取文件元数据失败: {}", e)))?;
            files.push(MediaFile {
                name: entry.file_name().to_string_lossy().to_string(),
                size_bytes: meta.len(),
                last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub fn save(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.safe_path(name)?;
        std::fs::create_dir_all(&self.media_root)
            .map_err(|e| AppError::storage(format!("创建媒体目录失败: {}", e)))?;
        std::fs::write(&path, bytes)
            .map_err(|e| AppError::storage(format!("写入 {} 失败: {}", path.display(), e)))?;
        tracing::info!("媒体文件已保存: {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    pub fn delete(&self, name: &str) -> AppResult<bool> {
        let path = self.safe_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .map_err(|e| AppError::storage(format!("删除 {} 失败: {}", path.display(), e)))?;
        tracing::info!("媒体文件已删除: {}", name);
        Ok(true)
    }

    pub fn read(&self, name: &str) -> AppResult<Option<Vec<u8>>> {
        let path = self.safe_path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)
            .map_err(|e| AppError::storage(format!("读取 {} 失败: {}", path.display(), e)))?;
        Ok(Some(bytes))
    }
}

/// 按扩展名推断 Content-Type（静态资源路由使用）
/// Infer Content-Type by extension (used by the static resource routes)
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        "pdf" => "application/pdf",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}
