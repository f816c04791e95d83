use std::sync::Arc;

use vs_core::ports::{
    ActivityLogPort, AirplaneModePort, ClockPort, DeviceInfoPort, LocationPermissionPort,
    LocationServicePort, SystemSettingsPort, TransportPort,
};

/// Platform capabilities the scan runtime drives.
///
/// 扫描运行时依赖的平台能力（依赖注入）。
#[derive(Clone)]
pub struct ScanDeps {
    pub transport: Arc<dyn TransportPort>,
    pub airplane: Arc<dyn AirplaneModePort>,
    pub location: Arc<dyn LocationServicePort>,
    pub permission: Arc<dyn LocationPermissionPort>,
    pub settings: Arc<dyn SystemSettingsPort>,
    pub device_info: Arc<dyn DeviceInfoPort>,
    pub activity_log: Arc<dyn ActivityLogPort>,
    pub clock: Arc<dyn ClockPort>,
}
