use utoipa::OpenApi;

/// OpenAPI 文档聚合：JSON 编辑接口
/// OpenAPI aggregation over the JSON edit APIs
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::content_api::list_posts,
        crate::modules::content_api::save_post,
        crate::modules::content_api::delete_post,
        crate::modules::content_api::list_pages,
        crate::modules::content_api::save_page,
        crate::modules::content_api::delete_page,
    ),
    components(
        schemas(
            crate::modules::content_api::ApiCredentials,
            crate::modules::content_api::SavePostRequest,
            crate::modules::content_api::SavePageRequest,
            crate::modules::content_api::DeleteRequest,
            crate::modules::content_api::SavedItem,
            crate::files::manager::MediaFile,
        )
    ),
    tags(
        (name = "Content", description = "页面与文章的编辑接口")
    )
)]
pub struct ApiDoc;
