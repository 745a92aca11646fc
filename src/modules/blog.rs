use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::auth::policy::{self, PolicyDecision, BLOG_EDIT_POLICY};
use crate::auth::session::MaybeUser;
use crate::error::{AppError, AppResult};
use crate::http::html;
use crate::state::ContentState;
use crate::views::{self, PageContext};

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    #[serde(default)]
    pub page: Option<usize>,
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/blog").route(web::get().to(blog_index)));
    cfg.service(web::resource("/blog/{slug}").route(web::get().to(post_view)));
}

/// 去掉 HTML 标签，生成列表摘要
/// Strip markup for the index summary
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn summarize(meta_description: &str, content: &str) -> String {
    if !meta_description.is_empty() {
        return meta_description.to_string();
    }
    let text = strip_tags(content);
    let trimmed = text.trim();
    if trimmed.chars().count() <= 200 {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(200).collect();
        format!("{}…", cut)
    }
}

async fn blog_index(
    query: web::Query<BlogQuery>,
    user: MaybeUser,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let project = state.projects.default_project().await;
    let now = Utc::now();
    let visible: Vec<_> = state
        .store
        .list_posts(&project.id)?
        .into_iter()
        .filter(|p| p.is_visible(now))
        .collect();

    let per_page = project.posts_per_page.max(1);
    let page_count = visible.len().div_ceil(per_page).max(1);
    let page_num = query.page.unwrap_or(1).clamp(1, page_count);

    let entries: Vec<_> = visible
        .iter()
        .skip((page_num - 1) * per_page)
        .take(per_page)
        .map(|p| {
            json!({
                "slug": p.slug,
                "title": p.title,
                "pub_date": p.pub_date.format("%Y-%m-%d").to_string(),
                "summary": summarize(&p.meta_description, &p.content),
            })
        })
        .collect();

    let ctx = PageContext {
        title: &project.title,
        meta_description: &project.description,
        nav: &state.nav,
        user: user.user().map(|u| u.display_name.as_str()),
        copyright: project.copyright_notice.as_deref(),
    };
    let body = views::render_in_layout(
        "blog",
        &json!({
            "project_title": project.title,
            "posts": entries,
            "prev_page": (page_num > 1).then(|| page_num - 1),
            "next_page": (page_num < page_count).then(|| page_num + 1),
        }),
        &ctx,
    )?;
    Ok(html(body))
}

async fn post_view(
    path: web::Path<String>,
    user: MaybeUser,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let project = state.projects.default_project().await;
    let post = state
        .store
        .get_post(&project.id, &slug)?
        .ok_or_else(|| AppError::not_found(format!("post '{}'", slug)))?;

    // 草稿与未来发布的文章只有编辑可预览
    // Drafts and future-dated posts are visible to editors only
    if !post.is_visible(Utc::now()) {
        let decision = policy::authorize(user.user(), BLOG_EDIT_POLICY).await;
        if decision != PolicyDecision::Granted {
            return Err(AppError::not_found(format!("post '{}'", slug)));
        }
    }

    let ctx = PageContext {
        title: &post.title,
        meta_description: &post.meta_description,
        nav: &state.nav,
        user: user.user().map(|u| u.display_name.as_str()),
        copyright: project.copyright_notice.as_deref(),
    };
    let body = views::render_in_layout(
        "post",
        &json!({
            "title": post.title,
            "author": post.author,
            "pub_date": post.pub_date.format("%Y-%m-%d").to_string(),
            "categories": post.categories,
            "content": post.content,
        }),
        &ctx,
    )?;
    Ok(html(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn test_summarize_prefers_meta_description() {
        assert_eq!(summarize("the meta", "<p>ignored</p>"), "the meta");
    }

    #[test]
    fn test_summarize_truncates_long_content() {
        let long = format!("<p>{}</p>", "x".repeat(500));
        let summary = summarize("", &long);
        assert!(summary.chars().count() <= 201);
        assert!(summary.ends_with('…'));
    }
}
