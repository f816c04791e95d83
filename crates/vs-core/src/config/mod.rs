//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic or policies / 禁止任何业务逻辑或策略**
//! ❌ **No validation beyond type mapping / 禁止类型映射以外的验证**
//!
//! Missing keys map to the documented defaults. The settle delays of the scan
//! flow are constants and deliberately absent from this module.

mod app_config;

pub use app_config::{AppConfig, ConfigError};
