use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::auth::policy::{self, PolicyDecision, PAGE_EDIT_POLICY};
use crate::auth::session::MaybeUser;
use crate::content::model::{is_valid_slug, Page, ProjectSettings};
use crate::error::{AppError, AppResult};
use crate::http::html;
use crate::state::ContentState;
use crate::views::{self, PageContext};

/// 页面路由是兜底路由，必须注册在其它路由之后，
/// 否则 /login 这类路径会被 {slug} 吞掉
/// The page routes are the fallback and must be registered last,
/// otherwise paths like /login are swallowed by {slug}
pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)));
    cfg.service(web::resource("/{slug}").route(web::get().to(page_view)));
}

async fn home(user: MaybeUser, state: web::Data<ContentState>) -> AppResult<HttpResponse> {
    let project = state.projects.default_project().await;
    match state.store.get_page(&project.id, &project.default_page_slug)? {
        Some(page) => render_page(&project, page, &user, &state).await,
        // 还没有默认页时渲染项目介绍 / no default page yet, render the project blurb
        None => {
            let ctx = PageContext {
                title: &project.title,
                meta_description: &project.description,
                nav: &state.nav,
                user: user.user().map(|u| u.display_name.as_str()),
                copyright: project.copyright_notice.as_deref(),
            };
            let body = views::render_in_layout(
                "page",
                &json!({
                    "title": project.title,
                    "content": format!("<p>{}</p>", project.description),
                }),
                &ctx,
            )?;
            Ok(html(body))
        }
    }
}

async fn page_view(
    path: web::Path<String>,
    user: MaybeUser,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    if !is_valid_slug(&slug) {
        return Err(AppError::not_found(format!("page '{}'", slug)));
    }
    let project = state.projects.default_project().await;
    let page = state
        .store
        .get_page(&project.id, &slug)?
        .ok_or_else(|| AppError::not_found(format!("page '{}'", slug)))?;
    render_page(&project, page, &user, &state).await
}

async fn render_page(
    project: &ProjectSettings,
    page: Page,
    user: &MaybeUser,
    state: &ContentState,
) -> AppResult<HttpResponse> {
    // 未发布页面只有编辑可预览 / unpublished pages preview for editors only
    if !page.is_visible(Utc::now()) {
        let decision = policy::authorize(user.user(), PAGE_EDIT_POLICY).await;
        if decision != PolicyDecision::Granted {
            return Err(AppError::not_found(format!("page '{}'", page.slug)));
        }
    }

    let ctx = PageContext {
        title: &page.title,
        meta_description: &page.meta_description,
        nav: &state.nav,
        user: user.user().map(|u| u.display_name.as_str()),
        copyright: project.copyright_notice.as_deref(),
    };
    let body = views::render_in_layout(
        "page",
        &json!({
            "title": page.title,
            "content": page.content,
        }),
        &ctx,
    )?;
    Ok(html(body))
}
