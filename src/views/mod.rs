use handlebars::Handlebars;
use lazy_static::lazy_static;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::nav::NavNode;

lazy_static! {
    static ref TEMPLATES: Handlebars<'static> = {
        let mut registry = Handlebars::new();
        let sources = [
            ("layout", include_str!("templates/layout.hbs")),
            ("page", include_str!("templates/page.hbs")),
            ("post", include_str!("templates/post.hbs")),
            ("blog", include_str!("templates/blog.hbs")),
            ("login", include_str!("templates/login.hbs")),
            ("error", include_str!("templates/error.hbs")),
            ("filemanager", include_str!("templates/filemanager.hbs")),
        ];
        for (name, source) in sources {
            registry
                .register_template_string(name, source)
                .unwrap_or_else(|e| panic!("模板 {} 注册失败: {}", name, e));
        }
        registry
    };
}

/// 渲染单个模板
pub fn render(name: &str, data: &serde_json::Value) -> AppResult<String> {
    TEMPLATES
        .render(name, data)
        .map_err(|e| AppError::render(format!("模板 {} 渲染失败: {}", name, e)))
}

/// 页面渲染上下文：布局所需的公共字段
/// Page render context: the common fields the layout needs
pub struct PageContext<'a> {
    pub title: &'a str,
    pub meta_description: &'a str,
    pub nav: &'a [NavNode],
    /// 登录用户的显示名；匿名为 None
    pub user: Option<&'a str>,
    pub copyright: Option<&'a str>,
}

/// 渲染内部模板并包进站点布局
/// Render an inner template and wrap it in the site layout
pub fn render_in_layout(
    name: &str,
    data: &serde_json::Value,
    ctx: &PageContext<'_>,
) -> AppResult<String> {
    let body = render(name, data)?;
    render(
        "layout",
        &json!({
            "title": ctx.title,
            "meta_description": ctx.meta_description,
            "nav": ctx.nav,
            "user": ctx.user,
            "copyright": ctx.copyright,
            "body": body,
        }),
    )
}

/// 渲染错误页；渲染失败时退化为最简 HTML，错误路径不允许再失败
/// Render the error page; degrades to bare HTML because the error path
/// must not fail again
pub fn render_error_page(status: u16, message: &str, nav: &[NavNode]) -> String {
    let ctx = PageContext {
        title: "Error",
        meta_description: "",
        nav,
        user: None,
        copyright: None,
    };
    render_in_layout(
        "error",
        &json!({ "status": status, "message": message }),
        &ctx,
    )
    .unwrap_or_else(|_| {
        format!(
            "<html><body><h1>{}</h1><p>{}</p></body></html>",
            status, message
        )
    })
}
