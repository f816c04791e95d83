//! Environment ports - airplane mode, location service, location permission
//! and the OS settings screen.
//!
//! 环境端口：飞行模式、定位服务、定位权限以及系统设置。
//!
//! Toggle and resolution requests are fire-and-forget. The orchestrator
//! re-verifies the state on the next query instead of awaiting a result.

use std::sync::Arc;

use async_trait::async_trait;

use super::Subscription;
use crate::environment::{EnvironmentConfig, LocationStatus, PermissionRationale, PermissionStatus};

pub type LocationStatusHandler = Arc<dyn Fn(LocationStatus) + Send + Sync>;

#[async_trait]
pub trait AirplaneModePort: Send + Sync {
    async fn is_airplane_mode_enabled(&self) -> anyhow::Result<bool>;

    /// Ask the OS to turn airplane mode off. No completion is reported.
    async fn request_disable_airplane_mode(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait LocationServicePort: Send + Sync {
    /// Subscribe to live location-settings changes.
    fn subscribe_location_status(&self, handler: LocationStatusHandler) -> Subscription;

    /// Ask the OS to report the current settings through the live stream.
    async fn check_settings(&self, config: &EnvironmentConfig) -> anyhow::Result<()>;

    /// Show the OS resolution UI for enabling location.
    async fn request_resolution(&self, config: &EnvironmentConfig) -> anyhow::Result<()>;
}

#[async_trait]
pub trait LocationPermissionPort: Send + Sync {
    async fn request_location_permission(
        &self,
        rationale: &PermissionRationale,
    ) -> anyhow::Result<PermissionStatus>;
}

#[async_trait]
pub trait SystemSettingsPort: Send + Sync {
    async fn open_settings(&self) -> anyhow::Result<()>;
}
