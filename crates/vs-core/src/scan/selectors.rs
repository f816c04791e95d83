//! Read-only projections of the machine for the screen.

use serde::{Deserialize, Serialize};

use super::context::ScanContext;
use super::state::{FlightState, LocationState, ReviewState, ScanState};
use crate::device::DeviceInfo;

/// Point-in-time copy of the machine's state and context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub state: ScanState,
    pub context: ScanContext,
}

/// Message and button label telling the user how to unblock scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remediation {
    pub message: String,
    pub button: String,
}

impl Remediation {
    fn new(message: &str, button: &str) -> Self {
        Self {
            message: message.to_string(),
            button: button.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

impl ScanSnapshot {
    pub fn new(state: ScanState, context: ScanContext) -> Self {
        Self { state, context }
    }

    pub fn status_message(&self) -> &'static str {
        match self.state {
            ScanState::Connecting => "Connecting...",
            ScanState::ExchangingDeviceInfo => "Exchanging device info...",
            ScanState::Invalid => "Invalid QR Code",
            _ => "",
        }
    }

    /// Airplane mode wins over location problems.
    pub fn remediation(&self) -> Remediation {
        if self.is_airplane_enabled() {
            Remediation::new(
                "Flight mode must be disabled for the scanning functionality",
                "Disable flight mode",
            )
        } else if self.is_location_disabled() {
            Remediation::new(
                "Location services must be enabled for the scanning functionality",
                "Enable location services",
            )
        } else if self.is_location_denied() {
            Remediation::new(
                "Location permission is required for the scanning functionality",
                "Allow access to location",
            )
        } else {
            Remediation::default()
        }
    }

    pub fn receiver_info(&self) -> Option<&DeviceInfo> {
        self.context.receiver_info.as_ref()
    }

    pub fn reason(&self) -> &str {
        &self.context.reason
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::FindingConnection
    }

    pub fn is_reviewing(&self) -> bool {
        matches!(self.state, ScanState::Reviewing(_))
    }

    pub fn is_selecting_credential(&self) -> bool {
        self.review_is(ReviewState::SelectingCredential)
    }

    pub fn is_sending_credential(&self) -> bool {
        self.review_is(ReviewState::SendingCredential)
    }

    pub fn is_accepted(&self) -> bool {
        self.review_is(ReviewState::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        self.review_is(ReviewState::Rejected)
    }

    pub fn should_navigate_home(&self) -> bool {
        self.review_is(ReviewState::NavigatingToHome)
    }

    pub fn is_invalid(&self) -> bool {
        self.state == ScanState::Invalid
    }

    pub fn is_disconnected(&self) -> bool {
        self.state == ScanState::Disconnected
    }

    pub fn is_airplane_enabled(&self) -> bool {
        self.state == ScanState::CheckingAirplaneMode(FlightState::Enabled)
    }

    pub fn is_location_disabled(&self) -> bool {
        self.state == ScanState::CheckingLocationService(LocationState::Disabled)
    }

    pub fn is_location_denied(&self) -> bool {
        self.state == ScanState::CheckingLocationService(LocationState::Denied)
    }

    fn review_is(&self, child: ReviewState) -> bool {
        self.state == ScanState::Reviewing(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(state: ScanState) -> ScanSnapshot {
        ScanSnapshot::new(state, ScanContext::default())
    }

    #[test]
    fn status_message_only_for_progress_and_invalid() {
        assert_eq!(at(ScanState::Connecting).status_message(), "Connecting...");
        assert_eq!(
            at(ScanState::ExchangingDeviceInfo).status_message(),
            "Exchanging device info..."
        );
        assert_eq!(at(ScanState::Invalid).status_message(), "Invalid QR Code");
        assert_eq!(at(ScanState::FindingConnection).status_message(), "");
        assert_eq!(
            at(ScanState::Reviewing(ReviewState::Idle)).status_message(),
            ""
        );
    }

    #[test]
    fn remediation_follows_preflight_state() {
        let flight = at(ScanState::CheckingAirplaneMode(FlightState::Enabled)).remediation();
        assert_eq!(flight.button, "Disable flight mode");

        let disabled =
            at(ScanState::CheckingLocationService(LocationState::Disabled)).remediation();
        assert_eq!(disabled.button, "Enable location services");

        let denied = at(ScanState::CheckingLocationService(LocationState::Denied)).remediation();
        assert_eq!(
            denied.message,
            "Location permission is required for the scanning functionality"
        );

        assert!(at(ScanState::FindingConnection).remediation().is_empty());
    }

    #[test]
    fn review_queries_match_only_their_child() {
        let sending = at(ScanState::Reviewing(ReviewState::SendingCredential));
        assert!(sending.is_reviewing());
        assert!(sending.is_sending_credential());
        assert!(!sending.is_accepted());
        assert!(!sending.is_scanning());

        assert!(at(ScanState::Reviewing(ReviewState::NavigatingToHome)).should_navigate_home());
        assert!(at(ScanState::Reviewing(ReviewState::Rejected)).is_rejected());
    }
}
