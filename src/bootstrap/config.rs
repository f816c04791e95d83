//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - Locate the configuration file / 定位配置文件
//! - Read TOML and map it into `AppConfig` / 读取 TOML 并映射为 `AppConfig`
//! - Report I/O and parsing errors with context / 报告带上下文的错误
//!
//! Missing keys keep their defaults; values are not validated here.

use std::path::{Path, PathBuf};

use anyhow::Context;
use vs_core::AppConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "VIDSHARE_CONFIG";

const FALLBACK_DEVICE_NAME: &str = "Unknown Device";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read, is not valid TOML, or names an
/// unknown location priority.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value).context("Failed to map config")
}

/// `$VIDSHARE_CONFIG`, else `<config_dir>/vidshare/config.toml`.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("vidshare").join("config.toml"))
}

/// Loads `path` when it exists, otherwise starts from defaults.
///
/// An empty device name is replaced by the host name.
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) if path.exists() => load_config(path)?,
        Some(path) => {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            AppConfig::default()
        }
        None => AppConfig::default(),
    };

    if config.device_name.is_empty() {
        config.device_name = gethostname::gethostname()
            .to_str()
            .unwrap_or(FALLBACK_DEVICE_NAME)
            .to_string();
    }
    Ok(config)
}
