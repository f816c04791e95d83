//! vidshare application orchestration layer
//!
//! Drives the scan state machine against the platform ports and exposes the
//! session to the host as a handle.

pub mod usecases;

pub use usecases::scan::{
    ScanDeps, ScanError, ScanHandle, ScanOrchestrator, ScanScreenModel, ScanScreenView,
};
