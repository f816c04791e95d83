use thiserror::Error;

use crate::environment::{EnvironmentConfig, LocationPriority, PermissionRationale};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown location priority `{0}`")]
    UnknownPriority(String),
}

/// Application configuration DTO
/// 应用配置 DTO
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Device label used by diagnostic logging (may be empty - the host fills it in)
    /// 诊断日志使用的设备名称（可能为空 - 由宿主补全）
    pub device_name: String,

    /// Location prompt configuration
    /// 定位提示配置
    pub location: EnvironmentConfig,

    /// Permission rationale texts
    /// 权限请求说明文字
    pub permission_prompt: PermissionRationale,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    pub fn from_toml(toml_value: &toml::Value) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let section = |name: &str| toml_value.get(name);
        let str_at = |section: Option<&toml::Value>, key: &str| {
            section
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let bool_at = |section: Option<&toml::Value>, key: &str| {
            section.and_then(|s| s.get(key)).and_then(|v| v.as_bool())
        };

        let general = section("general");
        let location = section("location");
        let prompt = section("permission_prompt");

        let priority = match str_at(location, "priority") {
            Some(raw) => parse_priority(&raw)?,
            None => defaults.location.priority,
        };

        Ok(Self {
            device_name: str_at(general, "device_name").unwrap_or_default(),
            location: EnvironmentConfig {
                priority,
                always_show: bool_at(location, "always_show")
                    .unwrap_or(defaults.location.always_show),
                need_ble: bool_at(location, "need_ble").unwrap_or(defaults.location.need_ble),
            },
            permission_prompt: PermissionRationale {
                title: str_at(prompt, "title").unwrap_or(defaults.permission_prompt.title),
                message: str_at(prompt, "message").unwrap_or(defaults.permission_prompt.message),
                button_negative: str_at(prompt, "button_negative")
                    .unwrap_or(defaults.permission_prompt.button_negative),
                button_positive: str_at(prompt, "button_positive")
                    .unwrap_or(defaults.permission_prompt.button_positive),
            },
        })
    }
}

fn parse_priority(raw: &str) -> Result<LocationPriority, ConfigError> {
    match raw {
        "high_accuracy" => Ok(LocationPriority::HighAccuracy),
        "balanced_power_accuracy" => Ok(LocationPriority::BalancedPowerAccuracy),
        "low_power" => Ok(LocationPriority::LowPower),
        "no_power" => Ok(LocationPriority::NoPower),
        other => Err(ConfigError::UnknownPriority(other.to_string())),
    }
}
