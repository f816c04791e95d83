//! Transport port - abstracts the proximity transport
//!
//! The transport carries serialized envelopes between two devices once a
//! connection exists. Destroying the connection is fire-and-forget: there is
//! no completion signal, so callers wait a settle delay afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::Subscription;
use crate::connection::{ConnectionDescriptor, ConnectionRole};
use crate::protocol::TransportEvent;

/// Callback for nearby transport events (`onDisconnected`, `msg`).
pub type NearbyEventHandler = Arc<dyn Fn(TransportEvent) + Send + Sync>;

/// Callback for the transport's own log stream.
pub type LogEventHandler = Arc<dyn Fn(Value) + Send + Sync>;

#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Tear down the current connection, if any.
    ///
    /// Returns immediately; the teardown finishes at some later point.
    async fn destroy_connection(&self) -> anyhow::Result<()>;

    /// Hand the scanned descriptor to the transport before connecting.
    async fn set_connection_parameters(&self, descriptor: &ConnectionDescriptor)
        -> anyhow::Result<()>;

    /// Resolves once the connection is established.
    async fn create_connection(&self, role: ConnectionRole) -> anyhow::Result<()>;

    /// Resolves once the payload has been sent.
    async fn send(&self, payload: String) -> anyhow::Result<()>;

    fn subscribe_nearby_events(&self, handler: NearbyEventHandler) -> Subscription;

    fn subscribe_log_events(&self, handler: LogEventHandler) -> Subscription;
}
