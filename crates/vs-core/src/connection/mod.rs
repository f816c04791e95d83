//! Connection descriptors parsed from scanned tokens.

mod descriptor;
mod role;

pub use descriptor::{validate_token, ConnectionDescriptor, TokenError};
pub use role::ConnectionRole;
