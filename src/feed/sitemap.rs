use chrono::Utc;

use crate::content::model::{Page, Post, ProjectSettings};
use crate::feed::xml_escape;

/// 为项目的已发布页面与文章生成站点地图
/// Render the sitemap for a project's published pages and posts
pub fn render_sitemap(project: &ProjectSettings, pages: &[Page], posts: &[Post]) -> String {
    let now = Utc::now();
    let site_url = project.site_url.trim_end_matches('/');

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for page in pages.iter().filter(|p| p.is_visible(now)) {
        let loc = if page.slug == project.default_page_slug {
            format!("{}/", site_url)
        } else {
            format!("{}/{}", site_url, page.slug)
        };
        push_url(&mut xml, &loc, &page.last_modified.to_rfc3339());
    }

    for post in posts.iter().filter(|p| p.is_visible(now)) {
        let loc = format!("{}/blog/{}", site_url, post.slug);
        push_url(&mut xml, &loc, &post.last_modified.to_rfc3339());
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str) {
    xml.push_str("<url>\n");
    xml.push_str(&format!("<loc>{}</loc>\n", xml_escape(loc)));
    xml.push_str(&format!("<lastmod>{}</lastmod>\n", xml_escape(lastmod)));
    xml.push_str("</url>\n");
}
