use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::device::DeviceInfo;
use crate::protocol::{InboundSignal, TransferOutcome};

/// Events that drive the scan flow.
///
/// 驱动扫描流程的事件。
///
/// The first group is the public surface posted by the host and the user.
/// The rest are posted back by the application layer when an action it ran
/// produces a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScanEvent {
    // ===== Host lifecycle =====
    ScreenFocus,
    ScreenBlur,
    /// App returned to the foreground.
    AppActive,

    // ===== User =====
    /// Raw scanned token.
    Scan(String),
    AcceptRequest,
    SelectCredential(Credential),
    UpdateReason(String),
    Cancel,
    Dismiss,
    LocationRequest,
    FlightRequest,

    // ===== Environment results =====
    FlightEnabled,
    FlightDisabled,
    LocationEnabled,
    LocationDisabled,
    PermissionGranted,
    PermissionDenied,

    // ===== Connection results =====
    /// Settle delay after destroying the connection elapsed.
    ConnectionCleared,
    LocalDeviceInfoReceived(DeviceInfo),
    Connected,
    /// Connect, send or local device info failed.
    ConnectionFailed,

    // ===== Protocol =====
    PeerInfoReceived(DeviceInfo),
    PeerDisconnected,
    TransferCompleted(TransferOutcome),
}

impl ScanEvent {
    /// Stable upper-case name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScreenFocus => "SCREEN_FOCUS",
            Self::ScreenBlur => "SCREEN_BLUR",
            Self::AppActive => "APP_ACTIVE",
            Self::Scan(_) => "SCAN",
            Self::AcceptRequest => "ACCEPT_REQUEST",
            Self::SelectCredential(_) => "SELECT_CREDENTIAL",
            Self::UpdateReason(_) => "UPDATE_REASON",
            Self::Cancel => "CANCEL",
            Self::Dismiss => "DISMISS",
            Self::LocationRequest => "LOCATION_REQUEST",
            Self::FlightRequest => "FLIGHT_REQUEST",
            Self::FlightEnabled => "FLIGHT_ENABLED",
            Self::FlightDisabled => "FLIGHT_DISABLED",
            Self::LocationEnabled => "LOCATION_ENABLED",
            Self::LocationDisabled => "LOCATION_DISABLED",
            Self::PermissionGranted => "PERMISSION_GRANTED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ConnectionCleared => "CONNECTION_CLEARED",
            Self::LocalDeviceInfoReceived(_) => "RECEIVE_DEVICE_INFO",
            Self::Connected => "CONNECTED",
            Self::ConnectionFailed => "CONNECTION_FAILED",
            Self::PeerInfoReceived(_) => "EXCHANGE_DONE",
            Self::PeerDisconnected => "DISCONNECT",
            Self::TransferCompleted(TransferOutcome::Accepted) => "VID_ACCEPTED",
            Self::TransferCompleted(TransferOutcome::Rejected) => "VID_REJECTED",
        }
    }
}

impl From<InboundSignal> for ScanEvent {
    fn from(signal: InboundSignal) -> Self {
        match signal {
            InboundSignal::PeerDisconnected => Self::PeerDisconnected,
            InboundSignal::PeerInfo(info) => Self::PeerInfoReceived(info),
            InboundSignal::TransferCompleted(outcome) => Self::TransferCompleted(outcome),
        }
    }
}
