use actix_web::web;
use lazy_static::lazy_static;
use std::sync::RwLock;

/// 路由配置函数类型
pub type RouteConfigFn = fn(&mut web::ServiceConfig);

/// 路由信息结构
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub name: String,
    pub description: String,
    pub module: String,
    pub config_fn: RouteConfigFn,
}

/// 全局路由注册器
///
/// 注册顺序就是匹配顺序：兜底的页面路由必须最后注册，
/// /login 这类 {controller}/{action} 风格的路径才能先被解析
/// Registration order is match order: the fallback page routes must be
/// registered last so that {controller}/{action}-style paths like /login
/// resolve first
#[derive(Debug)]
pub struct RouteRegistry {
    routes: Vec<RouteInfo>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// 注册路由；重名视为重复注册，直接覆盖
    pub fn register_route(&mut self, route_info: RouteInfo) {
        if let Some(existing) = self.routes.iter_mut().find(|r| r.name == route_info.name) {
            *existing = route_info;
        } else {
            self.routes.push(route_info);
        }
    }

    pub fn get_routes(&self) -> &Vec<RouteInfo> {
        &self.routes
    }

    pub fn get_routes_by_module(&self, module: &str) -> Vec<&RouteInfo> {
        self.routes
            .iter()
            .filter(|route| route.module == module)
            .collect()
    }

    /// 按注册顺序配置所有路由到 ServiceConfig
    pub fn configure_all_routes(&self, cfg: &mut web::ServiceConfig) {
        for route_info in &self.routes {
            (route_info.config_fn)(cfg);
        }
    }

    /// 获取路由统计信息
    pub fn get_stats(&self) -> (usize, Vec<String>) {
        let total = self.routes.len();
        let modules: Vec<String> = self
            .routes
            .iter()
            .map(|route| route.module.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        (total, modules)
    }

    /// 打印路由信息
    pub fn print_routes_info(&self) {
        for route in &self.routes {
            tracing::info!("路由 [{}] {}: {}", route.module, route.name, route.description);
        }
        let (total, modules) = self.get_stats();
        tracing::info!("总计 {} 组路由，{} 个模块", total, modules.len());
    }
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// 全局路由注册器实例
lazy_static! {
    static ref GLOBAL_ROUTE_REGISTRY: RwLock<RouteRegistry> = RwLock::new(RouteRegistry::new());
}

/// 注册路由到全局注册器
pub fn register_global_route(route_info: RouteInfo) {
    let mut registry = GLOBAL_ROUTE_REGISTRY.write().unwrap();
    registry.register_route(route_info);
}

/// 配置所有全局路由
pub fn configure_global_routes(cfg: &mut web::ServiceConfig) {
    let registry = GLOBAL_ROUTE_REGISTRY.read().unwrap();
    registry.configure_all_routes(cfg);
}

/// 打印全局路由信息
pub fn print_global_routes_info() {
    let registry = GLOBAL_ROUTE_REGISTRY.read().unwrap();
    registry.print_routes_info();
}

/// 获取全局路由统计信息
pub fn get_global_routes_stats() -> (usize, Vec<String>) {
    let registry = GLOBAL_ROUTE_REGISTRY.read().unwrap();
    registry.get_stats()
}

/// 便捷宏：注册路由
#[macro_export]
macro_rules! register_route {
    ($name:expr, $description:expr, $module:expr, $config_fn:expr) => {
        $crate::bootstrap::route_registry::register_global_route(
            $crate::bootstrap::route_registry::RouteInfo {
                name: $name.to_string(),
                description: $description.to_string(),
                module: $module.to_string(),
                config_fn: $config_fn,
            },
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_cfg: &mut web::ServiceConfig) {}

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = RouteRegistry::new();
        for name in ["statics", "account", "pages"] {
            registry.register_route(RouteInfo {
                name: name.to_string(),
                description: String::new(),
                module: "test".to_string(),
                config_fn: noop,
            });
        }
        let names: Vec<&str> = registry.get_routes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["statics", "account", "pages"]);
    }

    #[test]
    fn test_reregistration_keeps_position() {
        let mut registry = RouteRegistry::new();
        for name in ["a", "b"] {
            registry.register_route(RouteInfo {
                name: name.to_string(),
                description: "first".to_string(),
                module: "test".to_string(),
                config_fn: noop,
            });
        }
        registry.register_route(RouteInfo {
            name: "a".to_string(),
            description: "second".to_string(),
            module: "test".to_string(),
            config_fn: noop,
        });
        let routes = registry.get_routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].name, "a");
        assert_eq!(routes[0].description, "second");
    }
}
