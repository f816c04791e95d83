use serde::{Deserialize, Serialize};

use crate::connection::ConnectionDescriptor;
use crate::credential::SelectedCredential;
use crate::device::DeviceInfo;

/// Data accumulated across the scan states.
///
/// Device infos are replaced wholesale on receipt. `reason` and `selected`
/// only live inside the review phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanContext {
    pub descriptor: Option<ConnectionDescriptor>,
    pub sender_info: Option<DeviceInfo>,
    pub receiver_info: Option<DeviceInfo>,
    pub reason: String,
    pub selected: Option<SelectedCredential>,
}

impl ScanContext {
    pub(crate) fn clear_review(&mut self) {
        self.reason.clear();
        self.selected = None;
    }
}
