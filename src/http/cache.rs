/// 命名缓存配置：控制器按名字引用，时长集中声明
/// Named cache profiles: controllers reference by name, durations declared in one place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheProfile {
    pub name: &'static str,
    pub duration_secs: u32,
}

/// 站点地图缓存配置（30 秒）
pub const SITE_MAP_CACHE_PROFILE: CacheProfile = CacheProfile {
    name: "SiteMapCacheProfile",
    duration_secs: 30,
};

/// RSS 缓存配置（100 秒）
pub const RSS_CACHE_PROFILE: CacheProfile = CacheProfile {
    name: "RssCacheProfile",
    duration_secs: 100,
};

impl CacheProfile {
    /// Cache-Control 头的取值
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.duration_secs)
    }
}

/// 对响应体内容生成强 ETag
/// Build a strong ETag over the response body
pub fn build_etag(content: &[u8]) -> String {
    use sha1::{Digest, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(content);
    let hash = hasher.finalize();
    format!("\"{:x}\"", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control_values() {
        assert_eq!(SITE_MAP_CACHE_PROFILE.cache_control(), "public, max-age=30");
        assert_eq!(RSS_CACHE_PROFILE.cache_control(), "public, max-age=100");
    }

    #[test]
    fn test_etag_is_stable_and_quoted() {
        let a = build_etag(b"hello");
        let b = build_etag(b"hello");
        let c = build_etag(b"world");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }
}
