//! Scan-and-share flow.
//!
//! A pure hierarchical state machine: [`ScanStateMachine::handle`] consumes one
//! [`ScanEvent`], updates the state and context, and returns the exit,
//! transition and entry [`ScanAction`]s in the order they must run. The
//! application layer executes the actions and posts results back as events.

pub mod action;
pub mod context;
pub mod event;
mod selectors;
pub mod state;
pub mod state_machine;
pub mod timing;

pub use action::ScanAction;
pub use context::ScanContext;
pub use event::ScanEvent;
pub use selectors::{Remediation, ScanSnapshot};
pub use state::{FlightState, LocationState, ReviewState, ScanState};
pub use state_machine::ScanStateMachine;
pub use timing::{CONNECTION_SETTLE_DELAY, PERMISSION_SETTLE_DELAY};
