use tokio::sync::{mpsc, oneshot, watch};
use vs_core::{Credential, ScanEvent, ScanSnapshot};

use super::orchestrator::Command;
use super::ScanError;

/// Cloneable handle to a running scan orchestrator.
///
/// Each event method resolves once the event has been processed, with the
/// snapshot taken right after it. Results of the actions it started arrive
/// later through [`subscribe`](Self::subscribe).
#[derive(Clone)]
pub struct ScanHandle {
    tx: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ScanSnapshot>,
}

impl ScanHandle {
    pub(crate) fn new(
        tx: mpsc::UnboundedSender<Command>,
        snapshots: watch::Receiver<ScanSnapshot>,
    ) -> Self {
        Self { tx, snapshots }
    }

    // === Host lifecycle ===

    pub async fn screen_focus(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::ScreenFocus).await
    }

    pub async fn screen_blur(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::ScreenBlur).await
    }

    pub async fn app_active(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::AppActive).await
    }

    // === User ===

    pub async fn scan(&self, token: impl Into<String>) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::Scan(token.into())).await
    }

    pub async fn accept_request(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::AcceptRequest).await
    }

    pub async fn select_credential(
        &self,
        credential: Credential,
    ) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::SelectCredential(credential)).await
    }

    pub async fn update_reason(&self, reason: impl Into<String>) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::UpdateReason(reason.into())).await
    }

    pub async fn cancel(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::Cancel).await
    }

    pub async fn dismiss(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::Dismiss).await
    }

    pub async fn location_request(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::LocationRequest).await
    }

    pub async fn flight_request(&self) -> Result<ScanSnapshot, ScanError> {
        self.dispatch(ScanEvent::FlightRequest).await
    }

    // === Queries ===

    pub fn snapshot(&self) -> ScanSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until a published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&ScanSnapshot) -> bool,
    ) -> Result<ScanSnapshot, ScanError> {
        let mut snapshots = self.subscribe();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| ScanError::Stopped)?;
        Ok(snapshot.clone())
    }

    /// Tears down every listener and stops the runtime.
    pub async fn shutdown(&self) -> Result<(), ScanError> {
        let (reply, done) = oneshot::channel();
        self.tx
            .send(Command::Shutdown { reply })
            .map_err(|_| ScanError::Stopped)?;
        done.await.map_err(|_| ScanError::ReplyDropped)
    }

    async fn dispatch(&self, event: ScanEvent) -> Result<ScanSnapshot, ScanError> {
        let (reply, processed) = oneshot::channel();
        self.tx
            .send(Command::Dispatch { event, reply })
            .map_err(|_| ScanError::Stopped)?;
        processed.await.map_err(|_| ScanError::ReplyDropped)
    }
}
