use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 内容项目设置，来自 simplecontent-settings.json 的 content_projects 段
/// Content project settings, bound from the content_projects section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub copyright_notice: Option<String>,
    /// 博客索引每页文章数
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
    /// RSS 输出的最大条目数
    #[serde(default = "default_max_feed_items")]
    pub max_feed_items: usize,
    /// 站点根路径请求渲染的默认页面
    #[serde(default = "default_page_slug")]
    pub default_page_slug: String,
    /// 媒体文件目录（文件管理器的根）
    #[serde(default = "default_media_folder")]
    pub media_folder: String,
    /// feed 链接使用的站点地址
    #[serde(default)]
    pub site_url: String,
}

fn default_posts_per_page() -> usize {
    10
}
fn default_max_feed_items() -> usize {
    20
}
fn default_page_slug() -> String {
    "home".to_string()
}
fn default_media_folder() -> String {
    "media".to_string()
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            title: "Content Center".to_string(),
            description: String::new(),
            copyright_notice: None,
            posts_per_page: default_posts_per_page(),
            max_feed_items: default_max_feed_items(),
            default_page_slug: default_page_slug(),
            media_folder: default_media_folder(),
            site_url: String::new(),
        }
    }
}

/// 博客文章
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub pub_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub is_published: bool,
}

/// 内容页面
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta_description: String,
    /// 菜单排序
    #[serde(default)]
    pub page_order: i32,
    /// 是否出现在导航菜单
    #[serde(default)]
    pub show_in_menu: bool,
    pub pub_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub is_published: bool,
}

impl Post {
    /// 匿名访客可见：已发布且发布时间不在未来
    /// Visible to anonymous viewers: published and not future-dated
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_published && self.pub_date <= now
    }
}

impl Page {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_published && self.pub_date <= now
    }
}

lazy_static! {
    static ref SLUG_STRIP: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref SLUG_VALID: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap();
}

/// 由标题派生 slug：小写，字母数字之外折叠为单个连字符
/// Derive a slug from a title: lowercase, non-alphanumerics collapse to a
/// single dash
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let replaced = SLUG_STRIP.replace_all(&lowered, "-");
    replaced.trim_matches('-').to_string()
}

/// slug 是否合法（也用于防御路径穿越）
/// Whether a slug is well-formed (also guards against path traversal)
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_VALID.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust  &  Web  "), "rust-web");
        assert_eq!(slugify("Ünïcode Títle"), "n-code-t-tle");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_slug_validation_rejects_traversal() {
        assert!(is_valid_slug("hello-world"));
        assert!(!is_valid_slug("../etc/passwd"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("UPPER"));
        assert!(!is_valid_slug("-leading"));
    }

    #[test]
    fn test_future_dated_post_is_hidden() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let post = Post {
            slug: "soon".to_string(),
            title: "Soon".to_string(),
            author: String::new(),
            content: String::new(),
            meta_description: String::new(),
            categories: vec![],
            pub_date: now + chrono::Duration::hours(1),
            last_modified: now,
            is_published: true,
        };
        assert!(!post.is_visible(now));
        assert!(post.is_visible(now + chrono::Duration::hours(2)));
    }

    #[test]
    fn test_unpublished_page_is_hidden() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let page = Page {
            slug: "draft".to_string(),
            title: "Draft".to_string(),
            author: String::new(),
            content: String::new(),
            meta_description: String::new(),
            page_order: 0,
            show_in_menu: false,
            pub_date: now - chrono::Duration::days(1),
            last_modified: now,
            is_published: false,
        };
        assert!(!page.is_visible(now));
    }

    #[test]
    fn test_project_settings_defaults() {
        let p: ProjectSettings =
            serde_json::from_str(r#"{"id": "blog", "title": "My Blog"}"#).unwrap();
        assert_eq!(p.posts_per_page, 10);
        assert_eq!(p.max_feed_items, 20);
        assert_eq!(p.default_page_slug, "home");
        assert_eq!(p.media_folder, "media");
    }
}
