use serde::{Deserialize, Serialize};

use crate::comm::config::get_global_config_manager;

/// 导航菜单节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavNode {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub children: Vec<NavNode>,
}

/// 从配置 navigation 段加载导航树；未配置时给 Home/Blog 默认菜单
/// Load the navigation tree from the navigation section; falls back to a
/// default Home/Blog menu when unconfigured
pub fn load_navigation() -> Vec<NavNode> {
    if let Ok(mgr) = get_global_config_manager() {
        if let Ok(nodes) = mgr.get::<Vec<NavNode>>("navigation") {
            if !nodes.is_empty() {
                return nodes;
            }
        }
    }
    default_navigation()
}

pub fn default_navigation() -> Vec<NavNode> {
    vec![
        NavNode {
            text: "Home".to_string(),
            url: "/".to_string(),
            children: vec![],
        },
        NavNode {
            text: "Blog".to_string(),
            url: "/blog".to_string(),
            children: vec![],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_navigation_shape() {
        let nav = default_navigation();
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].url, "/");
        assert_eq!(nav[1].url, "/blog");
    }

    #[test]
    fn test_node_deserializes_without_children() {
        let node: NavNode =
            serde_json::from_str(r#"{"text": "Docs", "url": "/docs"}"#).unwrap();
        assert!(node.children.is_empty());
    }
}
