//! 配置源合并语义的集成测试：后加载覆盖先加载，环境变量最后生效
//! Merge semantics of the configuration sources: later overrides earlier,
//! environment variables win last

use config::FileFormat;
use content_center::comm::config::{ConfigManager, ConfigSource};

fn write_temp(name: &str, content: &str) -> String {
    let path = std::env::temp_dir().join(format!(
        "content-center-cfg-{}-{}",
        name,
        std::process::id()
    ));
    std::fs::write(&path, content).expect("写入临时配置失败");
    path.to_string_lossy().to_string()
}

/// 基础文件 + 环境文件：环境文件覆盖重叠键，保留其余键
/// Base file + environment file: the environment file overrides
/// overlapping keys and keeps the rest
#[test]
fn test_environment_file_overrides_base_file() {
    let base = write_temp(
        "appsettings.json",
        r#"{"site": {"title": "base title", "tagline": "kept"}, "server": {"port": 3000}}"#,
    );
    let overlay = write_temp(
        "appsettings.Development.json",
        r#"{"site": {"title": "dev title"}, "server": {"port": 5000}}"#,
    );

    let manager = ConfigManager::with_sources(vec![
        ConfigSource::File {
            path: base,
            format: Some(FileFormat::Json),
            required: true,
        },
        ConfigSource::File {
            path: overlay,
            format: Some(FileFormat::Json),
            required: true,
        },
    ])
    .unwrap();

    assert_eq!(manager.get::<String>("site.title").unwrap(), "dev title");
    assert_eq!(manager.get::<String>("site.tagline").unwrap(), "kept");
    assert_eq!(manager.get::<i64>("server.port").unwrap(), 5000);
}

/// 四个设置文件按顺序合并：auth 与 content 段都可见
/// The four settings files merge in order: both the auth and the content
/// sections are visible in one tree
#[test]
fn test_auth_and_content_sections_merge_into_one_tree() {
    let app = write_temp("app.json", r#"{"logging": {"level": "warn"}}"#);
    let auth = write_temp(
        "auth.json",
        r#"{"auth_settings": {"cookie_name": "application"}, "users": [{"username": "admin"}]}"#,
    );
    let content = write_temp(
        "content.json",
        r#"{"content_projects": [{"id": "default", "title": "Site"}]}"#,
    );

    let manager = ConfigManager::with_sources(vec![
        ConfigSource::File {
            path: app,
            format: Some(FileFormat::Json),
            required: true,
        },
        ConfigSource::File {
            path: auth,
            format: Some(FileFormat::Json),
            required: true,
        },
        ConfigSource::File {
            path: content,
            format: Some(FileFormat::Json),
            required: true,
        },
    ])
    .unwrap();

    assert_eq!(manager.get::<String>("logging.level").unwrap(), "warn");
    assert_eq!(
        manager
            .get::<String>("auth_settings.cookie_name")
            .unwrap(),
        "application"
    );
    assert!(manager.exists("content_projects"));
    assert!(manager.validate_required_keys(&["users", "content_projects"]).is_ok());
}

/// 环境变量排在所有文件之后，覆盖文件里的值
/// Environment variables come after every file and override file values
#[test]
fn test_environment_variables_override_files() {
    std::env::set_var("APP_FEEDLIMIT", "7");
    let file = write_temp("env-base.json", r#"{"feedlimit": 3}"#);

    let manager = ConfigManager::with_sources(vec![ConfigSource::File {
        path: file,
        format: Some(FileFormat::Json),
        required: true,
    }])
    .unwrap();

    // 默认源里的 APP 前缀环境变量生效 / the APP-prefixed env source applies
    assert_eq!(manager.get::<i64>("feedlimit").unwrap(), 7);
    std::env::remove_var("APP_FEEDLIMIT");
}
