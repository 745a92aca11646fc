use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::policy::{self, BLOG_EDIT_POLICY, PAGE_EDIT_POLICY};
use crate::auth::session::MaybeUser;
use crate::content::model::{is_valid_slug, slugify, Page, Post};
use crate::error::{ApiResponse, AppError, AppResult};
use crate::http::json_ok;
use crate::state::ContentState;

/// 远程发布客户端随请求体携带的凭据，
/// 走 ProjectSecurityResolver 而不是会话 Cookie
/// Credentials carried in the request body by remote publishing clients,
/// resolved through the ProjectSecurityResolver instead of the session cookie
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApiCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SavePostRequest {
    #[serde(default)]
    pub credentials: Option<ApiCredentials>,
    pub title: String,
    /// 省略时由标题派生 / derived from the title when omitted
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SavePageRequest {
    #[serde(default)]
    pub credentials: Option<ApiCredentials>,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub page_order: i32,
    #[serde(default)]
    pub show_in_menu: bool,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    #[serde(default)]
    pub credentials: Option<ApiCredentials>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedItem {
    pub slug: String,
}

fn default_published() -> bool {
    true
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/posts")
            .route(web::get().to(list_posts))
            .route(web::post().to(save_post)),
    );
    cfg.service(web::resource("/api/posts/{slug}").route(web::delete().to(delete_post)));
    cfg.service(
        web::resource("/api/pages")
            .route(web::get().to(list_pages))
            .route(web::post().to(save_page)),
    );
    cfg.service(web::resource("/api/pages/{slug}").route(web::delete().to(delete_page)));
}

/// 编辑接口的双通道授权：优先会话 Cookie 策略，
/// 否则用请求体凭据走项目安全解析器
/// Dual-path authorization for the edit APIs: the session-cookie policy
/// first, otherwise body credentials through the project security resolver
async fn authorize_edit(
    user: &MaybeUser,
    credentials: Option<&ApiCredentials>,
    state: &ContentState,
    project_id: &str,
    policy_name: &str,
) -> AppResult<()> {
    if user.is_authenticated() {
        return policy::enforce_api(user.user(), policy_name).await;
    }
    if let Some(creds) = credentials {
        let result = state
            .resolver
            .resolve(&creds.username, &creds.password, project_id)
            .await;
        if !result.is_authenticated {
            return Err(AppError::auth("凭据无效"));
        }
        let allowed = match policy_name {
            PAGE_EDIT_POLICY => result.can_edit_pages,
            _ => result.can_edit_posts,
        };
        if !allowed {
            return Err(AppError::permission("没有该项目的编辑权限"));
        }
        return Ok(());
    }
    Err(AppError::auth("需要登录"))
}

fn resolve_slug(explicit: Option<&str>, title: &str) -> AppResult<String> {
    let slug = match explicit {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slugify(title),
    };
    if !is_valid_slug(&slug) {
        return Err(AppError::validation("slug", "非法的 slug"));
    }
    Ok(slug)
}

// ==================== 文章 ====================

/// 列出项目的全部文章（含草稿），编辑视角
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "全部文章，含草稿"),
        (status = 401, description = "未登录"),
        (status = 403, description = "缺少 BlogEditPolicy 所需角色")
    ),
    tag = "Content"
)]
pub async fn list_posts(
    user: MaybeUser,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    policy::enforce_api(user.user(), BLOG_EDIT_POLICY).await?;
    let project = state.projects.default_project().await;
    let posts = state.store.list_posts(&project.id)?;
    Ok(json_ok(ApiResponse::success(posts)))
}

/// 新建或更新文章（按 slug 定位）
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = SavePostRequest,
    responses(
        (status = 200, description = "已保存", body = SavedItem),
        (status = 401, description = "未登录且凭据无效"),
        (status = 403, description = "缺少编辑权限")
    ),
    tag = "Content"
)]
pub async fn save_post(
    user: MaybeUser,
    req: web::Json<SavePostRequest>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let req = req.into_inner();
    let project = state.projects.default_project().await;
    authorize_edit(
        &user,
        req.credentials.as_ref(),
        &state,
        &project.id,
        BLOG_EDIT_POLICY,
    )
    .await?;

    let slug = resolve_slug(req.slug.as_deref(), &req.title)?;
    let now = Utc::now();
    let existing = state.store.get_post(&project.id, &slug)?;
    let post = Post {
        slug: slug.clone(),
        title: req.title,
        author: req.author,
        content: req.content,
        meta_description: req.meta_description,
        categories: req.categories,
        pub_date: req
            .pub_date
            .or(existing.as_ref().map(|p| p.pub_date))
            .unwrap_or(now),
        last_modified: now,
        is_published: req.is_published,
    };
    state.store.save_post(&project.id, &post)?;
    Ok(json_ok(ApiResponse::success(SavedItem { slug })))
}

/// 删除文章
#[utoipa::path(
    delete,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "文章 slug")),
    responses(
        (status = 200, description = "已删除"),
        (status = 404, description = "文章不存在")
    ),
    tag = "Content"
)]
pub async fn delete_post(
    user: MaybeUser,
    path: web::Path<String>,
    body: Option<web::Json<DeleteRequest>>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let project = state.projects.default_project().await;
    let credentials = body.as_ref().and_then(|b| b.credentials.clone());
    authorize_edit(
        &user,
        credentials.as_ref(),
        &state,
        &project.id,
        BLOG_EDIT_POLICY,
    )
    .await?;

    if !state.store.delete_post(&project.id, &slug)? {
        return Err(AppError::not_found(format!("post '{}'", slug)));
    }
    Ok(json_ok(ApiResponse::success(SavedItem { slug })))
}

// ==================== 页面 ====================

/// 列出项目的全部页面（含草稿），编辑视角
#[utoipa::path(
    get,
    path = "/api/pages",
    responses(
        (status = 200, description = "全部页面，含草稿"),
        (status = 401, description = "未登录"),
        (status = 403, description = "缺少 PageEditPolicy 所需角色")
    ),
    tag = "Content"
)]
pub async fn list_pages(
    user: MaybeUser,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    policy::enforce_api(user.user(), PAGE_EDIT_POLICY).await?;
    let project = state.projects.default_project().await;
    let pages = state.store.list_pages(&project.id)?;
    Ok(json_ok(ApiResponse::success(pages)))
}

/// 新建或更新页面（按 slug 定位）
#[utoipa::path(
    post,
    path = "/api/pages",
    request_body = SavePageRequest,
    responses(
        (status = 200, description = "已保存", body = SavedItem),
        (status = 401, description = "未登录且凭据无效"),
        (status = 403, description = "缺少编辑权限")
    ),
    tag = "Content"
)]
pub async fn save_page(
    user: MaybeUser,
    req: web::Json<SavePageRequest>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let req = req.into_inner();
    let project = state.projects.default_project().await;
    authorize_edit(
        &user,
        req.credentials.as_ref(),
        &state,
        &project.id,
        PAGE_EDIT_POLICY,
    )
    .await?;

    let slug = resolve_slug(req.slug.as_deref(), &req.title)?;
    let now = Utc::now();
    let existing = state.store.get_page(&project.id, &slug)?;
    let page = Page {
        slug: slug.clone(),
        title: req.title,
        author: req.author,
        content: req.content,
        meta_description: req.meta_description,
        page_order: req.page_order,
        show_in_menu: req.show_in_menu,
        pub_date: req
            .pub_date
            .or(existing.as_ref().map(|p| p.pub_date))
            .unwrap_or(now),
        last_modified: now,
        is_published: req.is_published,
    };
    state.store.save_page(&project.id, &page)?;
    Ok(json_ok(ApiResponse::success(SavedItem { slug })))
}

/// 删除页面
#[utoipa::path(
    delete,
    path = "/api/pages/{slug}",
    params(("slug" = String, Path, description = "页面 slug")),
    responses(
        (status = 200, description = "已删除"),
        (status = 404, description = "页面不存在")
    ),
    tag = "Content"
)]
pub async fn delete_page(
    user: MaybeUser,
    path: web::Path<String>,
    body: Option<web::Json<DeleteRequest>>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let project = state.projects.default_project().await;
    let credentials = body.as_ref().and_then(|b| b.credentials.clone());
    authorize_edit(
        &user,
        credentials.as_ref(),
        &state,
        &project.id,
        PAGE_EDIT_POLICY,
    )
    .await?;

    if !state.store.delete_page(&project.id, &slug)? {
        return Err(AppError::not_found(format!("page '{}'", slug)));
    }
    Ok(json_ok(ApiResponse::success(SavedItem { slug })))
}
