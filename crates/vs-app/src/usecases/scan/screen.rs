//! Screen-facing view over a running scan session.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use vs_core::ports::CredentialSourcePort;
use vs_core::scan::Remediation;
use vs_core::{Credential, DeviceInfo, ScanSnapshot};

use super::{ScanError, ScanHandle};

/// Everything the scan screen renders, derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanScreenModel {
    pub status: &'static str,
    pub remediation: Remediation,
    pub receiver: Option<DeviceInfo>,
    pub reason: String,
    pub scanning: bool,
    pub reviewing: bool,
    pub selecting_credential: bool,
    pub sending_credential: bool,
    pub accepted: bool,
    pub rejected: bool,
    pub navigate_home: bool,
    pub invalid: bool,
    pub disconnected: bool,
}

impl From<&ScanSnapshot> for ScanScreenModel {
    fn from(snapshot: &ScanSnapshot) -> Self {
        Self {
            status: snapshot.status_message(),
            remediation: snapshot.remediation(),
            receiver: snapshot.receiver_info().cloned(),
            reason: snapshot.reason().to_string(),
            scanning: snapshot.is_scanning(),
            reviewing: snapshot.is_reviewing(),
            selecting_credential: snapshot.is_selecting_credential(),
            sending_credential: snapshot.is_sending_credential(),
            accepted: snapshot.is_accepted(),
            rejected: snapshot.is_rejected(),
            navigate_home: snapshot.should_navigate_home(),
            invalid: snapshot.is_invalid(),
            disconnected: snapshot.is_disconnected(),
        }
    }
}

/// Combines the scan session with the credentials the user can share.
#[derive(Clone)]
pub struct ScanScreenView {
    handle: ScanHandle,
    credentials: Arc<dyn CredentialSourcePort>,
}

impl ScanScreenView {
    pub fn new(handle: ScanHandle, credentials: Arc<dyn CredentialSourcePort>) -> Self {
        Self {
            handle,
            credentials,
        }
    }

    pub fn handle(&self) -> &ScanHandle {
        &self.handle
    }

    pub fn model(&self) -> ScanScreenModel {
        ScanScreenModel::from(&self.handle.snapshot())
    }

    pub async fn shareable_credentials(&self) -> anyhow::Result<Vec<Credential>> {
        self.credentials.list_shareable().await
    }

    /// True when there is nothing to share; the screen then shows its empty state.
    ///
    /// An unreadable credential source counts as empty.
    pub async fn is_empty(&self) -> bool {
        match self.shareable_credentials().await {
            Ok(credentials) => credentials.is_empty(),
            Err(err) => {
                warn!(error = %err, "listing shareable credentials failed");
                true
            }
        }
    }

    /// Closes the invalid-code notice. Does nothing in any other state.
    pub async fn dismiss_invalid(&self) -> Result<Option<ScanSnapshot>, ScanError> {
        if !self.handle.snapshot().is_invalid() {
            return Ok(None);
        }
        self.handle.dismiss().await.map(Some)
    }
}
