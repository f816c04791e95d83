//! Port interfaces for the application layer
//!
//! Ports define the contract between the scan orchestrator and the platform
//! services it drives: the proximity transport, the OS environment checks,
//! the device-info provider, the credential source, the activity log and the
//! clock. The core depends only on these traits, so every platform API can be
//! replaced with a fake in tests.
//!
//! ## Port Placement Guidelines
//!
//! A trait belongs in `vs-core/ports` when it represents a platform capability
//! that the orchestrator calls into and the platform layer implements.
//! Pure helpers stay in their domain module.

mod activity_log;
mod clock;
mod credential_source;
mod device_info;
pub mod environment;
mod subscription;
pub mod transport;

pub use activity_log::ActivityLogPort;
pub use clock::*;
pub use credential_source::CredentialSourcePort;
pub use device_info::DeviceInfoPort;
pub use environment::{
    AirplaneModePort, LocationPermissionPort, LocationServicePort, LocationStatusHandler,
    SystemSettingsPort,
};
pub use subscription::Subscription;
pub use transport::{LogEventHandler, NearbyEventHandler, TransportPort};
