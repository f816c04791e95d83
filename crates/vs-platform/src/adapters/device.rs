//! Static local device info
//! 静态本机设备信息

use async_trait::async_trait;
use vs_core::ports::DeviceInfoPort;
use vs_core::DeviceInfo;

#[derive(Debug, Clone)]
pub struct StaticDeviceInfo {
    info: DeviceInfo,
}

impl StaticDeviceInfo {
    pub fn new(info: DeviceInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl DeviceInfoPort for StaticDeviceInfo {
    async fn local_device_info(&self) -> anyhow::Result<DeviceInfo> {
        Ok(self.info.clone())
    }
}
