//! Environment preflight model: airplane mode, location service and
//! location permission.

mod config;
mod status;

pub use config::{EnvironmentConfig, LocationPriority, PermissionRationale};
pub use status::{LocationStatus, PermissionStatus};
