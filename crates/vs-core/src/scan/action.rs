use crate::connection::{ConnectionDescriptor, ConnectionRole};
use crate::credential::{Credential, SelectedCredential};
use crate::device::DeviceInfo;

/// Side-effects produced by scan transitions, in execution order.
///
/// 扫描状态迁移产生的副作用（按执行顺序排列）。
///
/// `Start*` actions open a scope in the application layer; the matching
/// `Cancel*`/`Stop*` action closes it on state exit.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanAction {
    // ===== Airplane mode =====
    QueryAirplaneMode,
    CancelAirplaneQuery,
    RequestDisableAirplaneMode,

    // ===== Location =====
    /// Subscribe to the live settings stream, then ask for a settings check.
    SubscribeLocationStatus,
    UnsubscribeLocationStatus,
    RequestEnableLocation,
    /// Settle delay, then the runtime permission request.
    StartPermissionCheck,
    CancelPermissionCheck,
    OpenSettings,

    // ===== Connection lifecycle =====
    /// Errors are swallowed: no connection is an already-satisfied state.
    DestroyConnection,
    StartSettleTimer,
    CancelSettleTimer,
    RemoveDiagnostics,
    RegisterDiagnostics,
    SetConnectionParameters(ConnectionDescriptor),
    RequestLocalDeviceInfo,
    CancelLocalDeviceInfo,
    CreateConnection(ConnectionRole),
    CancelConnect,

    // ===== Protocol =====
    /// Send `exchange:sender-info` and listen for `exchange:receiver-info`.
    StartHandshake(DeviceInfo),
    /// Send `send:vid` and listen for `send:vid:response`.
    StartTransfer(Credential),
    StopProtocol,

    // housekeeping
    LogShared {
        selected: SelectedCredential,
        receiver: DeviceInfo,
    },
}
