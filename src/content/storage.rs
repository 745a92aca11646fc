use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::content::model::{is_valid_slug, Page, Post};
use crate::error::{AppError, AppResult};

const PAGES_FOLDER: &str = "pages";
const POSTS_FOLDER: &str = "posts";

/// 无数据库的内容存储：每个条目一个 JSON 文档，
/// 目录布局 {root}/{project}/{pages|posts}/{slug}.json
/// NoDb content store: one JSON document per item,
/// laid out as {root}/{project}/{pages|posts}/{slug}.json
pub struct NoDbContentStore {
    root: PathBuf,
}

impl NoDbContentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn type_dir(&self, project_id: &str, type_folder: &str) -> AppResult<PathBuf> {
        if !is_valid_slug(project_id) {
            return Err(AppError::validation("project_id", "非法的项目标识"));
        }
        Ok(self.root.join(project_id).join(type_folder))
    }

    fn item_path(&self, project_id: &str, type_folder: &str, slug: &str) -> AppResult<PathBuf> {
        if !is_valid_slug(slug) {
            return Err(AppError::validation("slug", "非法的 slug"));
        }
        Ok(self
            .type_dir(project_id, type_folder)?
            .join(format!("{}.json", slug)))
    }

    fn read_item<T: DeserializeOwned>(&self, path: &Path) -> AppResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::storage(format!("读取 {} 失败: {}", path.display(), e)))?;
        let item = serde_json::from_str(&raw)
            .map_err(|e| AppError::storage(format!("解析 {} 失败: {}", path.display(), e)))?;
        Ok(Some(item))
    }

    fn write_item<T: Serialize>(&self, path: &Path, item: &T) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::storage(format!("创建目录失败: {}", e)))?;
        }
        let raw = serde_json::to_string_pretty(item)
            .map_err(|e| AppError::storage(format!("序列化失败: {}", e)))?;
        std::fs::write(path, raw)
            .map_err(|e| AppError::storage(format!("写入 {} 失败: {}", path.display(), e)))?;
        Ok(())
    }

    fn list_items<T: DeserializeOwned>(&self, dir: &Path) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        if !dir.exists() {
            return Ok(items);
        }
        let entries = std::fs::read_dir(dir)
            .map_err(|e| AppError::storage(format!("枚举 {} 失败: {}", dir.display(), e)))?;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if !is_json {
                continue;
            }
            match self.read_item::<T>(&path)? {
                Some(item) => items.push(item),
                None => {}
            }
        }
        Ok(items)
    }

    fn delete_item(&self, path: &Path) -> AppResult<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)
            .map_err(|e| AppError::storage(format!("删除 {} 失败: {}", path.display(), e)))?;
        Ok(true)
    }

    // ==================== 页面 ====================

    /// 列出项目的全部页面，按菜单顺序再按标题排序
    pub fn list_pages(&self, project_id: &str) -> AppResult<Vec<Page>> {
        let dir = self.type_dir(project_id, PAGES_FOLDER)?;
        let mut pages: Vec<Page> = self.list_items(&dir)?;
        pages.sort_by(|a, b| {
            a.page_order
                .cmp(&b.page_order)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(pages)
    }

    pub fn get_page(&self, project_id: &str, slug: &str) -> AppResult<Option<Page>> {
        let path = self.item_path(project_id, PAGES_FOLDER, slug)?;
        self.read_item(&path)
    }

    pub fn save_page(&self, project_id: &str, page: &Page) -> AppResult<()> {
        let path = self.item_path(project_id, PAGES_FOLDER, &page.slug)?;
        self.write_item(&path, page)
    }

    pub fn delete_page(&self, project_id: &str, slug: &str) -> AppResult<bool> {
        let path = self.item_path(project_id, PAGES_FOLDER, slug)?;
        self.delete_item(&path)
    }

    // ==================== 文章 ====================

    /// 列出项目的全部文章，新的在前
    pub fn list_posts(&self, project_id: &str) -> AppResult<Vec<Post>> {
        let dir = self.type_dir(project_id, POSTS_FOLDER)?;
        let mut posts: Vec<Post> = self.list_items(&dir)?;
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(posts)
    }

    pub fn get_post(&self, project_id: &str, slug: &str) -> AppResult<Option<Post>> {
        let path = self.item_path(project_id, POSTS_FOLDER, slug)?;
        self.read_item(&path)
    }

    pub fn save_post(&self, project_id: &str, post: &Post) -> AppResult<()> {
        let path = self.item_path(project_id, POSTS_FOLDER, &post.slug)?;
        self.write_item(&path, post)
    }

    pub fn delete_post(&self, project_id: &str, slug: &str) -> AppResult<bool> {
        let path = self.item_path(project_id, POSTS_FOLDER, slug)?;
        self.delete_item(&path)
    }
}
