use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::feed::{rss, sitemap};
use crate::http::{body_with_headers, build_etag, RSS_CACHE_PROFILE, SITE_MAP_CACHE_PROFILE};
use crate::state::ContentState;

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/rss").route(web::get().to(rss_feed)));
    cfg.service(web::resource("/api/sitemap").route(web::get().to(sitemap_feed)));
}

/// RSS 输出，RssCacheProfile（100 秒）
async fn rss_feed(state: web::Data<ContentState>) -> AppResult<HttpResponse> {
    let project = state.projects.default_project().await;
    let posts = state.store.list_posts(&project.id)?;
    let xml = rss::render_channel(&project, &posts);
    let etag = build_etag(xml.as_bytes());
    Ok(body_with_headers(
        StatusCode::OK,
        "application/rss+xml; charset=utf-8",
        xml,
        &[
            ("cache-control", &RSS_CACHE_PROFILE.cache_control()),
            ("etag", &etag),
        ],
    ))
}

/// 站点地图输出，SiteMapCacheProfile（30 秒）
async fn sitemap_feed(state: web::Data<ContentState>) -> AppResult<HttpResponse> {
    let project = state.projects.default_project().await;
    let pages = state.store.list_pages(&project.id)?;
    let posts = state.store.list_posts(&project.id)?;
    let xml = sitemap::render_sitemap(&project, &pages, &posts);
    let etag = build_etag(xml.as_bytes());
    Ok(body_with_headers(
        StatusCode::OK,
        "application/xml; charset=utf-8",
        xml,
        &[
            ("cache-control", &SITE_MAP_CACHE_PROFILE.cache_control()),
            ("etag", &etag),
        ],
    ))
}
