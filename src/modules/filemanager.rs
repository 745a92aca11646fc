use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::policy::{
    self, PolicyDecision, FILE_MANAGER_DELETE_POLICY, FILE_MANAGER_POLICY,
};
use crate::auth::session::{AuthState, MaybeUser};
use crate::error::{ApiResponse, AppResult};
use crate::http::{html, json_ok, see_other};
use crate::state::ContentState;
use crate::views::{self, PageContext};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub name: String,
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/filemanager").route(web::get().to(file_manager)));
    cfg.service(web::resource("/filemanager/upload").route(web::post().to(upload)));
    cfg.service(web::resource("/filemanager/delete").route(web::post().to(delete)));
    cfg.service(web::resource("/api/files").route(web::get().to(list_files)));
}

/// 文件管理页（FileManagerPolicy）
async fn file_manager(
    user: MaybeUser,
    req: HttpRequest,
    auth: web::Data<AuthState>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    if let Err(redirect) =
        policy::enforce_interactive(user.user(), FILE_MANAGER_POLICY, &auth.settings, req.path())
            .await
    {
        return Ok(redirect);
    }
    let can_delete =
        policy::authorize(user.user(), FILE_MANAGER_DELETE_POLICY).await == PolicyDecision::Granted;

    let files = state.files.list()?;
    let ctx = PageContext {
        title: "File manager",
        meta_description: "",
        nav: &state.nav,
        user: user.user().map(|u| u.display_name.as_str()),
        copyright: None,
    };
    let body = views::render_in_layout(
        "filemanager",
        &json!({ "files": files, "can_delete": can_delete }),
        &ctx,
    )?;
    Ok(html(body))
}

/// 上传：请求体即文件内容，文件名来自查询参数（FileManagerPolicy）
/// Upload: the request body is the file content, the name comes from the
/// query string (FileManagerPolicy)
async fn upload(
    user: MaybeUser,
    query: web::Query<UploadQuery>,
    bytes: web::Bytes,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    policy::enforce_api(user.user(), FILE_MANAGER_POLICY).await?;
    state.files.save(&query.name, &bytes)?;
    Ok(json_ok(ApiResponse::success(json!({ "name": query.name }))))
}

/// 删除走更严格的 FileManagerDeletePolicy
/// Deletion goes through the stricter FileManagerDeletePolicy
async fn delete(
    user: MaybeUser,
    req: HttpRequest,
    form: web::Form<DeleteForm>,
    auth: web::Data<AuthState>,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    if let Err(redirect) = policy::enforce_interactive(
        user.user(),
        FILE_MANAGER_DELETE_POLICY,
        &auth.settings,
        req.path(),
    )
    .await
    {
        return Ok(redirect);
    }
    state.files.delete(&form.name)?;
    Ok(see_other("/filemanager"))
}

/// JSON 文件列表（FileManagerPolicy）
async fn list_files(
    user: MaybeUser,
    state: web::Data<ContentState>,
) -> AppResult<HttpResponse> {
    policy::enforce_api(user.user(), FILE_MANAGER_POLICY).await?;
    let files = state.files.list()?;
    Ok(json_ok(ApiResponse::success(files)))
}
