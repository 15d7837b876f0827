use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub chart: ChartConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    // 查询参数缺失时使用的标的
    pub default_symbol: String,
}

/// # Summary
/// 数据源配置。
///
/// # Invariants
/// - `remote_base_url` 为空或缺失时，远端对象存储策略将从所有策略链中移除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    // 远端对象存储的公开访问前缀 (兼容旧变量 R2_PUBLIC_BASE)
    pub remote_base_url: Option<String>,
    // 本地数据根目录，包含 data/、records/、predictions_raw/
    pub local_root: String,
    // 静态资源目录，兜底看板文件位于 {static_dir}/data/dashboard.json
    pub static_dir: String,
    // 单次后端尝试的超时时间 (毫秒)
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    // 0 表示关闭缓存
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    // 聚合时保留的历史窗口 (小时)
    pub history_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub filter: String,
    // 设置后额外输出按天滚动的日志文件
    pub dir: Option<String>,
}

impl SourceConfig {
    /// 返回去除尾部斜杠后的远端前缀；未配置或为空时返回 None。
    pub fn remote_base(&self) -> Option<&str> {
        self.remote_base_url
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                default_symbol: "btc".to_string(),
            },
            source: SourceConfig {
                remote_base_url: None,
                local_root: ".".to_string(),
                static_dir: "web/public".to_string(),
                timeout_ms: 4_000,
            },
            cache: CacheConfig { ttl_secs: 0 },
            chart: ChartConfig { history_hours: 72 },
            log: LogConfig {
                filter: "info".to_string(),
                dir: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.default_symbol, "btc");
        assert_eq!(config.source.timeout_ms, 4_000);
        assert_eq!(config.cache.ttl_secs, 0);
        assert_eq!(config.chart.history_hours, 72);
        assert!(config.source.remote_base().is_none());
    }

    #[test]
    fn test_remote_base_trims_trailing_slash() {
        let mut source = AppConfig::default().source;
        source.remote_base_url = Some("https://bucket.example.com/".to_string());
        assert_eq!(source.remote_base(), Some("https://bucket.example.com"));

        source.remote_base_url = Some("   ".to_string());
        assert_eq!(source.remote_base(), None);
    }
}
