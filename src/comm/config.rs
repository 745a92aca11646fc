use anyhow::{anyhow, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_CONFIG_MANAGER: RwLock<Option<Arc<ConfigManager>>> = RwLock::new(None);
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },
    #[error("配置格式错误: {message}")]
    FormatError { message: String },
    #[error("配置项 '{key}' 不存在")]
    KeyNotFound { key: String },
    #[error("配置项 '{key}' 类型转换失败: {message}")]
    TypeConversionError { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 当前运行环境，来自 APP_ENVIRONMENT，默认 Production
/// Current environment, from APP_ENVIRONMENT, defaults to Production
pub fn current_environment() -> String {
    std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "Production".to_string())
}

pub fn is_development() -> bool {
    current_environment().eq_ignore_ascii_case("development")
}

/// 配置数据源信息
#[derive(Debug, Clone)]
pub struct ConfigSourceInfo {
    pub source_type: String,
    pub description: String,
    pub priority: u8,
    pub loaded: bool,
}

/// 配置管理器
///
/// 合并顺序（后加载者覆盖先加载者）：
/// appsettings.json -> appsettings.{Environment}.json
/// -> simpleauth-settings.json -> simplecontent-settings.json -> 环境变量
/// Merge order (later sources override earlier ones):
/// appsettings.json -> appsettings.{Environment}.json
/// -> simpleauth-settings.json -> simplecontent-settings.json -> env vars
pub struct ConfigManager {
    config: Config,
    sources_info: Vec<ConfigSourceInfo>,
}

impl ConfigManager {
    /// 使用默认配置源创建配置管理器
    pub fn new() -> Result<Self> {
        Self::with_sources(vec![])
    }

    /// 使用指定的配置源创建配置管理器（追加在默认源之后）
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self> {
        let mut builder = Config::builder();
        let mut sources_info = Vec::new();

        let environment = current_environment();
        let default_sources = vec![
            ConfigSource::File {
                path: "config/appsettings.json".to_string(),
                format: Some(FileFormat::Json),
                required: false,
            },
            ConfigSource::File {
                path: format!("config/appsettings.{}.json", environment),
                format: Some(FileFormat::Json),
                required: false,
            },
            ConfigSource::File {
                path: "config/simpleauth-settings.json".to_string(),
                format: Some(FileFormat::Json),
                required: false,
            },
            ConfigSource::File {
                path: "config/simplecontent-settings.json".to_string(),
                format: Some(FileFormat::Json),
                required: false,
            },
        ];
        // 环境变量永远排在所有文件之后 / env vars always come after every file
        let env_source = ConfigSource::Env {
            prefix: "APP".to_string(),
            separator: "_",
        };

        let mut priority = 1u8;

        // 预处理配置源，检查文件是否存在
        let mut valid_sources: Vec<(ConfigSource, ConfigSourceInfo)> = Vec::new();
        for source in default_sources
            .into_iter()
            .chain(sources)
            .chain(std::iter::once(env_source))
        {
            let source_info = source.get_source_info(priority);

            let should_add = match &source {
                ConfigSource::File { path, required, .. } => {
                    let file_exists = std::path::Path::new(path).exists();
                    if !file_exists && !required {
                        // 可选文件不存在，记录但不添加
                        sources_info.push(ConfigSourceInfo {
                            loaded: false,
                            source_type: source_info.source_type.clone(),
                            description: source_info.description.clone(),
                            priority: source_info.priority,
                        });
                        false
                    } else if !file_exists && *required {
                        return Err(anyhow!("必需的配置文件不存在: {}", path));
                    } else {
                        true
                    }
                }
                _ => true,
            };

            if should_add {
                valid_sources.push((source, source_info));
            }
            priority += 1;
        }

        for (source, source_info) in valid_sources {
            match source.add_to_builder(builder) {
                Ok(new_builder) => {
                    builder = new_builder;
                    sources_info.push(ConfigSourceInfo {
                        loaded: true,
                        ..source_info
                    });
                }
                Err(e) => {
                    return Err(anyhow!("添加配置源失败: {}", e));
                }
            }
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self {
            config,
            sources_info,
        })
    }

    /// 获取指定 key 的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config
            .get(key)
            .map_err(|e| anyhow!("获取配置 '{}' 失败: {}", key, e))
    }

    /// 获取指定 key 的配置值，如果不存在返回默认值
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// 安全获取配置值，返回详细错误信息
    pub fn get_safe<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, ConfigError> {
        self.config.get(key).map_err(|e| {
            if e.to_string().contains("not found") {
                ConfigError::KeyNotFound {
                    key: key.to_string(),
                }
            } else {
                ConfigError::TypeConversionError {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// 获取字符串配置值
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    /// 检查配置项是否存在
    pub fn exists(&self, key: &str) -> bool {
        self.config.get::<serde_json::Value>(key).is_ok()
    }

    /// 获取所有配置源信息
    pub fn get_sources_info(&self) -> &Vec<ConfigSourceInfo> {
        &self.sources_info
    }

    /// 获取配置源统计信息
    pub fn get_sources_stats(&self) -> (usize, usize, usize) {
        let total = self.sources_info.len();
        let loaded = self.sources_info.iter().filter(|info| info.loaded).count();
        let failed = total - loaded;
        (total, loaded, failed)
    }

    /// 打印配置源详细信息
    pub fn print_sources_info(&self) {
        for (index, info) in self.sources_info.iter().enumerate() {
            tracing::info!(
                "配置源 {}: {} loaded={} priority={} ({})",
                index + 1,
                info.source_type,
                info.loaded,
                info.priority,
                info.description
            );
        }
        let (total, loaded, failed) = self.get_sources_stats();
        tracing::info!("配置源统计: 总计 {} 成功 {} 失败 {}", total, loaded, failed);
    }

    /// 验证必需的配置项
    pub fn validate_required_keys(
        &self,
        required_keys: &[&str],
    ) -> std::result::Result<(), ConfigError> {
        for key in required_keys {
            if !self.exists(key) {
                return Err(ConfigError::KeyNotFound {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 配置源类型
pub enum ConfigSource {
    /// 文件配置源
    File {
        path: String,
        format: Option<FileFormat>,
        required: bool,
    },
    /// 环境变量配置源
    Env {
        prefix: String,
        separator: &'static str,
    },
    /// 内存配置源（HashMap）
    Memory(HashMap<String, serde_json::Value>),
    /// 字符串配置源
    String { content: String, format: FileFormat },
}

impl ConfigSource {
    /// 获取配置源信息
    pub fn get_source_info(&self, priority: u8) -> ConfigSourceInfo {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let format_str = match format {
                    Some(FileFormat::Toml) => "TOML",
                    Some(FileFormat::Json) => "JSON",
                    Some(FileFormat::Yaml) => "YAML",
                    None => "Auto-detect",
                    _ => "Unknown",
                };
                ConfigSourceInfo {
                    source_type: "File".to_string(),
                    description: format!(
                        "文件配置源: {} (格式: {}, 必需: {})",
                        path, format_str, required
                    ),
                    priority,
                    loaded: false,
                }
            }
            ConfigSource::Env { prefix, separator } => ConfigSourceInfo {
                source_type: "Environment".to_string(),
                description: format!("环境变量配置源: 前缀={}, 分隔符={}", prefix, separator),
                priority,
                loaded: false,
            },
            ConfigSource::Memory(map) => ConfigSourceInfo {
                source_type: "Memory".to_string(),
                description: format!("内存配置源: {} 个配置项", map.len()),
                priority,
                loaded: false,
            },
            ConfigSource::String { format, .. } => {
                let format_str = match format {
                    FileFormat::Toml => "TOML",
                    FileFormat::Json => "JSON",
                    _ => "Unknown",
                };
                ConfigSourceInfo {
                    source_type: "String".to_string(),
                    description: format!("字符串配置源: 格式={}", format_str),
                    priority,
                    loaded: false,
                }
            }
        }
    }

    pub fn add_to_builder(
        self,
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let file_source = if let Some(format) = format {
                    File::with_name(&path).format(format)
                } else {
                    File::with_name(&path)
                };
                if required {
                    Ok(builder.add_source(file_source.required(true)))
                } else {
                    Ok(builder.add_source(file_source))
                }
            }
            ConfigSource::Env { prefix, separator } => Ok(builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(separator)
                    .prefix_separator("_")
                    .ignore_empty(true),
            )),
            ConfigSource::Memory(map) => {
                let json_content = serde_json::to_string(&map)
                    .map_err(|e| anyhow!("序列化内存配置失败: {}", e))?;
                Ok(builder.add_source(File::from_str(&json_content, FileFormat::Json)))
            }
            ConfigSource::String { content, format } => {
                Ok(builder.add_source(File::from_str(&content, format)))
            }
        }
    }
}

/// 获取全局配置管理器实例（单例模式）
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let manager = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("读取全局配置管理器锁失败: {}", e))?;
        if let Some(ref config_manager) = *manager {
            return Ok(Arc::clone(config_manager));
        }
    }
    {
        let mut manager = GLOBAL_CONFIG_MANAGER
            .write()
            .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
        if manager.is_none() {
            let config_manager =
                Arc::new(ConfigManager::new().map_err(|e| anyhow!("创建配置管理器失败: {}", e))?);
            *manager = Some(Arc::clone(&config_manager));
            Ok(config_manager)
        } else {
            Ok(Arc::clone(manager.as_ref().unwrap()))
        }
    }
}

/// 全局配置获取函数（使用单例）
pub fn get_config<T: DeserializeOwned>(key: &str) -> Result<T> {
    let manager = get_global_config_manager()?;
    manager.get(key)
}

#[cfg(test)]
mod tests {
    use super::{ConfigManager, ConfigSource};
    use config::FileFormat;
    use std::collections::HashMap;

    #[test]
    fn test_config_manager_new() {
        let manager = ConfigManager::new();
        assert!(manager.is_ok());
    }

    #[test]
    fn test_config_from_string() {
        let json_content = r#"{"server": {"port": 8080}}"#.to_string();
        let source = ConfigSource::String {
            content: json_content,
            format: FileFormat::Json,
        };
        let manager = ConfigManager::with_sources(vec![source]).unwrap();
        assert_eq!(manager.get::<i64>("server.port").unwrap(), 8080);
    }

    #[test]
    fn test_config_from_memory() {
        let mut map = HashMap::new();
        map.insert(
            "server".to_string(),
            serde_json::json!({ "host": "127.0.0.1" }),
        );
        let source = ConfigSource::Memory(map);
        let manager = ConfigManager::with_sources(vec![source]).unwrap();
        assert_eq!(manager.get::<String>("server.host").unwrap(), "127.0.0.1");
    }

    // 后加载的配置源覆盖先加载的（appsettings 与环境文件的合并语义）
    // Later sources override earlier ones (appsettings vs environment file merge)
    #[test]
    fn test_later_source_overrides_earlier() {
        let base = ConfigSource::String {
            content: r#"{"site": {"title": "base", "theme": "plain"}}"#.to_string(),
            format: FileFormat::Json,
        };
        let overlay = ConfigSource::String {
            content: r#"{"site": {"title": "overridden"}}"#.to_string(),
            format: FileFormat::Json,
        };
        let manager = ConfigManager::with_sources(vec![base, overlay]).unwrap();
        assert_eq!(
            manager.get::<String>("site.title").unwrap(),
            "overridden"
        );
        // 未覆盖的键保持基础值 / untouched keys keep the base value
        assert_eq!(manager.get::<String>("site.theme").unwrap(), "plain");
    }

    #[test]
    fn test_validate_required_keys() {
        let source = ConfigSource::String {
            content: r#"{"server": {"port": 1}}"#.to_string(),
            format: FileFormat::Json,
        };
        let manager = ConfigManager::with_sources(vec![source]).unwrap();
        assert!(manager.validate_required_keys(&["server.port"]).is_ok());
        assert!(manager.validate_required_keys(&["server.missing"]).is_err());
    }
}
