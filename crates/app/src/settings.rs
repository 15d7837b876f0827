//! 配置加载：内置缺省值 → 可选 TOML 文件 → `PRICECAST__*` 环境变量 → 旧变量 `R2_PUBLIC_BASE`。

use config::{Config, ConfigError, Environment, File};
use pricecast_core::config::AppConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 缺省配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "config/pricecast.toml";
/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "PRICECAST_CONFIG";
/// 旧部署沿用的远端前缀变量
pub const LEGACY_REMOTE_VAR: &str = "R2_PUBLIC_BASE";

/// # Summary
/// 从进程环境加载配置。
///
/// # Logic
/// 1. 若设置了 `PRICECAST_CONFIG`，该文件必须存在；否则尝试读取缺省路径（可缺失）。
/// 2. 叠加进程环境变量。
pub fn load() -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = std::env::vars().collect();
    match vars.get(CONFIG_PATH_VAR) {
        Some(path) => load_from(Some(&PathBuf::from(path)), true, vars.clone()),
        None => load_from(Some(Path::new(DEFAULT_CONFIG_FILE)), false, vars),
    }
}

/// # Summary
/// 按层级合并配置来源。
///
/// # Arguments
/// * `file`: 可选的 TOML 配置文件。
/// * `required`: 文件缺失时是否报错。
/// * `vars`: 环境变量表。
///
/// # Returns
/// 合并后的 `AppConfig`；文件或变量无法解析时返回 `ConfigError`。
pub fn load_from(
    file: Option<&Path>,
    required: bool,
    vars: HashMap<String, String>,
) -> Result<AppConfig, ConfigError> {
    let legacy_remote = vars.get(LEGACY_REMOTE_VAR).cloned();

    let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(required));
    }
    builder
        .add_source(
            Environment::with_prefix("PRICECAST")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        )
        .set_override_option("source.remote_base_url", legacy_remote)?
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_from(None, false, HashMap::new()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.default_symbol, "btc");
        assert_eq!(config.source.timeout_ms, 4_000);
        assert_eq!(config.source.remote_base(), None);
        assert_eq!(config.cache.ttl_secs, 0);
        assert_eq!(config.chart.history_hours, 72);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_file_then_env_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricecast.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\ndefault_symbol = \"eth\"\n\n[source]\nlocal_root = \"/srv/data\"\n",
        )
        .unwrap();

        let config = load_from(
            Some(&path),
            true,
            vars(&[("PRICECAST__SERVER__PORT", "9100")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.default_symbol, "eth");
        assert_eq!(config.source.local_root, "/srv/data");
        assert_eq!(config.source.static_dir, "web/public");
    }

    #[test]
    fn test_legacy_remote_variable() {
        let config = load_from(
            None,
            false,
            vars(&[("R2_PUBLIC_BASE", "https://bucket.example.com/")]),
        )
        .unwrap();
        assert_eq!(
            config.source.remote_base(),
            Some("https://bucket.example.com")
        );
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let config = load_from(Some(Path::new("/nonexistent/pricecast.toml")), false, HashMap::new());
        assert!(config.is_ok());

        let required = load_from(Some(Path::new("/nonexistent/pricecast.toml")), true, HashMap::new());
        assert!(required.is_err());
    }
}
