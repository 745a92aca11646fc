//! 登录与授权策略的端到端流程测试
//! End-to-end flows for login and the authorization policies

mod common;

use actix_web::http::header;
use actix_web::{test, App};
use common::{configure_all, ensure_sa_token, test_env};

#[actix_web::test]
async fn test_login_sets_application_cookie_and_redirects() {
    ensure_sa_token().await;
    let env = test_env("login-ok");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(&[
            ("username", env.admin.as_str()),
            ("password", "admin123"),
            ("return_url", "/blog"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 303);
    let location = resp.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/blog");

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "application")
        .expect("登录必须写入 application cookie");
    assert!(!cookie.value().is_empty());
    assert!(cookie.http_only().unwrap_or(false));
}

#[actix_web::test]
async fn test_login_failure_rerenders_form() {
    ensure_sa_token().await;
    let env = test_env("login-bad");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(&[("username", env.admin.as_str()), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("Invalid username or password"));
    // 不下发 cookie / no cookie issued
    assert!(!text.is_empty());
}

/// /login 必须先于兜底的 {slug} 路由被解析
/// /login must resolve before the fallback {slug} route
#[actix_web::test]
async fn test_login_route_resolves_before_page_fallback() {
    ensure_sa_token().await;
    let env = test_env("login-route");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("<form"));
}

#[actix_web::test]
async fn test_api_requires_authentication() {
    ensure_sa_token().await;
    let env = test_env("api-anon");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

/// 已认证但不在 Administrators 角色 → 403
/// Authenticated without the Administrators role → 403
#[actix_web::test]
async fn test_non_admin_gets_403_from_protected_api() {
    ensure_sa_token().await;
    let env = test_env("api-reader");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    let login = test::TestRequest::post()
        .uri("/login")
        .set_form(&[("username", env.reader.as_str()), ("password", "reader123")])
        .to_request();
    let login_resp = test::call_service(&app, login).await;
    assert_eq!(login_resp.status(), 303);
    let cookie = login_resp
        .response()
        .cookies()
        .find(|c| c.name() == "application")
        .unwrap()
        .into_owned();

    for uri in ["/api/posts", "/api/pages", "/api/files"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403, "{} 应当拒绝非管理员", uri);
    }
}

/// 页面请求：匿名挑战跳登录页，缺角色跳拒绝访问页（/）
/// Interactive requests: anonymous challenge redirects to /login, a
/// missing role redirects to the access-denied path (/)
#[actix_web::test]
async fn test_filemanager_redirects() {
    ensure_sa_token().await;
    let env = test_env("fm-redirect");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    // 匿名 → /login，带原路径 / anonymous → /login carrying the original path
    let req = test::TestRequest::get().uri("/filemanager").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("/login"));
    assert!(location.contains("return_url=%2Ffilemanager"));

    // 非管理员 → /
    let login = test::TestRequest::post()
        .uri("/login")
        .set_form(&[("username", env.reader.as_str()), ("password", "reader123")])
        .to_request();
    let login_resp = test::call_service(&app, login).await;
    let cookie = login_resp
        .response()
        .cookies()
        .find(|c| c.name() == "application")
        .unwrap()
        .into_owned();

    let req = test::TestRequest::get()
        .uri("/filemanager")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_web::test]
async fn test_admin_reaches_filemanager_and_logout_clears_session() {
    ensure_sa_token().await;
    let env = test_env("fm-admin");
    let app = test::init_service(
        App::new()
            .app_data(env.auth_state.clone())
            .app_data(env.content_state.clone())
            .configure(configure_all),
    )
    .await;

    let login = test::TestRequest::post()
        .uri("/login")
        .set_form(&[("username", env.admin.as_str()), ("password", "admin123")])
        .to_request();
    let login_resp = test::call_service(&app, login).await;
    let cookie = login_resp
        .response()
        .cookies()
        .find(|c| c.name() == "application")
        .unwrap()
        .into_owned();

    let req = test::TestRequest::get()
        .uri("/filemanager")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // 登出后同一 cookie 不再有效
    let req = test::TestRequest::get()
        .uri("/logout")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);

    let req = test::TestRequest::get()
        .uri("/filemanager")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 303);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("/login"));
}
