use async_trait::async_trait;

use crate::device::DeviceInfo;

/// Provides this device's identity metadata for the handshake.
#[async_trait]
pub trait DeviceInfoPort: Send + Sync {
    async fn local_device_info(&self) -> anyhow::Result<DeviceInfo>;
}
