use chrono::Utc;

use crate::content::model::{Post, ProjectSettings};
use crate::feed::xml_escape;

/// 为项目的已发布文章生成 RSS 2.0 频道
/// Render the RSS 2.0 channel for a project's published posts
///
/// 输入应当已按发布时间倒序；条目数被 max_feed_items 截断
/// Input should already be newest-first; items are capped at max_feed_items
pub fn render_channel(project: &ProjectSettings, posts: &[Post]) -> String {
    let now = Utc::now();
    let site_url = project.site_url.trim_end_matches('/');

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n");
    xml.push_str("<channel>\n");
    xml.push_str(&format!("<title>{}</title>\n", xml_escape(&project.title)));
    xml.push_str(&format!(
        "<link>{}/blog</link>\n",
        xml_escape(site_url)
    ));
    xml.push_str(&format!(
        "<description>{}</description>\n",
        xml_escape(&project.description)
    ));
    if let Some(ref copyright) = project.copyright_notice {
        xml.push_str(&format!(
            "<copyright>{}</copyright>\n",
            xml_escape(copyright)
        ));
    }
    xml.push_str(&format!(
        "<lastBuildDate>{}</lastBuildDate>\n",
        now.to_rfc2822()
    ));

    for post in posts
        .iter()
        .filter(|p| p.is_visible(now))
        .take(project.max_feed_items)
    {
        xml.push_str("<item>\n");
        xml.push_str(&format!("<title>{}</title>\n", xml_escape(&post.title)));
        xml.push_str(&format!(
            "<link>{}/blog/{}</link>\n",
            xml_escape(site_url),
            xml_escape(&post.slug)
        ));
        xml.push_str(&format!(
            "<guid isPermaLink=\"false\">{}:{}</guid>\n",
            xml_escape(&project.id),
            xml_escape(&post.slug)
        ));
        if !post.author.is_empty() {
            xml.push_str(&format!("<author>{}</author>\n", xml_escape(&post.author)));
        }
        for category in &post.categories {
            xml.push_str(&format!(
                "<category>{}</category>\n",
                xml_escape(category)
            ));
        }
        xml.push_str(&format!(
            "<pubDate>{}</pubDate>\n",
            post.pub_date.to_rfc2822()
        ));
        let summary = if post.meta_description.is_empty() {
            &post.content
        } else {
            &post.meta_description
        };
        xml.push_str(&format!(
            "<description>{}</description>\n",
            xml_escape(summary)
        ));
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n");
    xml.push_str("</rss>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn project() -> ProjectSettings {
        ProjectSettings {
            id: "blog".to_string(),
            title: "Team <Blog>".to_string(),
            description: "news & notes".to_string(),
            site_url: "https://example.com/".to_string(),
            max_feed_items: 2,
            ..Default::default()
        }
    }

    fn post(slug: &str, hours_ago: i64, published: bool) -> Post {
        let now = Utc::now();
        Post {
            slug: slug.to_string(),
            title: format!("Post {}", slug),
            author: "admin".to_string(),
            content: "body".to_string(),
            meta_description: String::new(),
            categories: vec![],
            pub_date: now - Duration::hours(hours_ago),
            last_modified: now,
            is_published: published,
        }
    }

    #[test]
    fn test_channel_escapes_and_links() {
        let xml = render_channel(&project(), &[post("hello", 1, true)]);
        assert!(xml.contains("<title>Team &lt;Blog&gt;</title>"));
        assert!(xml.contains("<description>news &amp; notes</description>"));
        // 站点地址去掉尾随斜杠 / trailing slash trimmed from the site url
        assert!(xml.contains("<link>https://example.com/blog/hello</link>"));
    }

    #[test]
    fn test_unpublished_and_overflow_items_excluded() {
        let posts = vec![
            post("a", 1, true),
            post("draft", 2, false),
            post("b", 3, true),
            post("c", 4, true),
        ];
        let xml = render_channel(&project(), &posts);
        assert!(xml.contains("blog/a"));
        assert!(xml.contains("blog/b"));
        assert!(!xml.contains("draft"));
        // max_feed_items = 2，第三篇被截断 / third visible post capped
        assert!(!xml.contains("blog/c"));
    }
}
