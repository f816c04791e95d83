use serde::{Deserialize, Serialize};

use super::SelectedCredential;
use crate::device::DeviceInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Shared,
}

/// Entry handed to the external activity log after an accepted transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub key: String,
    pub action: ActivityAction,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub device_name: String,
    pub label: String,
}

impl ActivityLogEntry {
    pub fn shared(selected: &SelectedCredential, receiver: &DeviceInfo, timestamp: i64) -> Self {
        let credential = selected.credential();
        Self {
            key: credential.store_key(),
            action: ActivityAction::Shared,
            timestamp,
            device_name: receiver.display_name().to_string(),
            label: credential.label().to_string(),
        }
    }
}
