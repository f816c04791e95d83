//! # vs-core
//!
//! Core domain models and business logic for vidshare.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the data exchanged between two devices, the scanned-token validator, the
//! envelope codec, and the hierarchical scan state machine that the
//! application layer drives.

// Public module exports
pub mod config;
pub mod connection;
pub mod credential;
pub mod device;
pub mod environment;
pub mod ports;
pub mod protocol;
pub mod scan;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use connection::{validate_token, ConnectionDescriptor, ConnectionRole, TokenError};
pub use credential::{ActivityLogEntry, Credential, SelectedCredential};
pub use device::DeviceInfo;
pub use environment::{EnvironmentConfig, LocationPriority, PermissionRationale, PermissionStatus};
pub use protocol::{Envelope, EnvelopeError, MessageType, TransferOutcome, TransportEvent};
pub use scan::{ScanAction, ScanEvent, ScanSnapshot, ScanState, ScanStateMachine};
