//! Credential (VID) records and the activity entries emitted when one is shared.

mod activity;
mod credential;

pub use activity::{ActivityAction, ActivityLogEntry};
pub use credential::{Credential, SelectedCredential, CREDENTIAL_STORE_KEY_PREFIX};
