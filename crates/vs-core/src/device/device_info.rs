use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity metadata a device announces during the handshake.
///
/// The blob is opaque to the core: it is replaced wholesale on receipt and
/// never merged field by field. Unknown fields survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            device_name: Some(device_name.into()),
            ..Self::default()
        }
    }

    /// Name shown to the user: `name`, then `deviceName`, then empty.
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.device_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}
