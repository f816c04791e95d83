use serde::{Deserialize, Serialize};

/// Top-level scan state. Parent states carry their active child.
///
/// 扫描流程的顶层状态，父状态持有当前子状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    /// Screen not visible. Every listener is torn down.
    #[default]
    Inactive,
    CheckingAirplaneMode(FlightState),
    CheckingLocationService(LocationState),
    /// Previous connection destroyed, waiting for the transport to settle.
    ClearingConnection,
    /// Ready to scan. The only state that accepts a token.
    FindingConnection,
    /// Waiting for the local device info.
    PreparingToConnect,
    Connecting,
    /// Device-info handshake in progress.
    ExchangingDeviceInfo,
    Reviewing(ReviewState),
    Disconnected,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightState {
    CheckingStatus,
    Enabled,
    RequestingToDisable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationState {
    CheckingStatus,
    RequestingToEnable,
    CheckingPermission,
    Denied,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    Idle,
    SelectingCredential,
    SendingCredential,
    Accepted,
    Rejected,
    /// Terminal marker observed by the host to leave the screen.
    NavigatingToHome,
}

impl ScanState {
    /// Dotted path of the active state, e.g. `reviewing.sendingCredential`.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::CheckingAirplaneMode(child) => match child {
                FlightState::CheckingStatus => "checkingAirplaneMode.checkingStatus",
                FlightState::Enabled => "checkingAirplaneMode.enabled",
                FlightState::RequestingToDisable => "checkingAirplaneMode.requestingToDisable",
            },
            Self::CheckingLocationService(child) => match child {
                LocationState::CheckingStatus => "checkingLocationService.checkingStatus",
                LocationState::RequestingToEnable => "checkingLocationService.requestingToEnable",
                LocationState::CheckingPermission => "checkingLocationService.checkingPermission",
                LocationState::Denied => "checkingLocationService.denied",
                LocationState::Disabled => "checkingLocationService.disabled",
            },
            Self::ClearingConnection => "clearingConnection",
            Self::FindingConnection => "findingConnection",
            Self::PreparingToConnect => "preparingToConnect",
            Self::Connecting => "connecting",
            Self::ExchangingDeviceInfo => "exchangingDeviceInfo",
            Self::Reviewing(child) => match child {
                ReviewState::Idle => "reviewing.idle",
                ReviewState::SelectingCredential => "reviewing.selectingCredential",
                ReviewState::SendingCredential => "reviewing.sendingCredential",
                ReviewState::Accepted => "reviewing.accepted",
                ReviewState::Rejected => "reviewing.rejected",
                ReviewState::NavigatingToHome => "reviewing.navigatingToHome",
            },
            Self::Disconnected => "disconnected",
            Self::Invalid => "invalid",
        }
    }

    /// Whether `self` and `other` are children of the same parent state.
    pub(crate) fn same_parent(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}
