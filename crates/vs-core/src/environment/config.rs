use serde::{Deserialize, Serialize};

/// Accuracy tier requested from the location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPriority {
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
    NoPower,
}

/// Static configuration for the location prompt.
///
/// Read-only; set once when the machine is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub priority: LocationPriority,
    /// Force the OS resolution dialog even when it would normally be skipped.
    pub always_show: bool,
    /// Scanning relies on Bluetooth, which the OS ties to location.
    pub need_ble: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            priority: LocationPriority::BalancedPowerAccuracy,
            always_show: false,
            need_ble: true,
        }
    }
}

/// Texts shown alongside the runtime location permission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRationale {
    pub title: String,
    pub message: String,
    pub button_negative: String,
    pub button_positive: String,
}

impl Default for PermissionRationale {
    fn default() -> Self {
        Self {
            title: "Location access".to_string(),
            message: "Location access is required for the scanning functionality.".to_string(),
            button_negative: "Cancel".to_string(),
            button_positive: "OK".to_string(),
        }
    }
}
