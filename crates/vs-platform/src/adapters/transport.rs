//! Loopback proximity transport
//! 回环近场传输
//!
//! Connects to an in-process [`ScriptedPeer`] that answers the handshake and
//! the credential transfer the way it was told to. Replies are delivered to
//! the nearby-event subscribers after the peer's latency, from a spawned task.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use vs_core::ports::{LogEventHandler, NearbyEventHandler, Subscription, TransportPort};
use vs_core::protocol::TransferResponse;
use vs_core::{ConnectionDescriptor, ConnectionRole, DeviceInfo, Envelope, MessageType, TransportEvent};

use crate::sync::lock;

/// How the peer answers `exchange:sender-info`.
#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeReply {
    ReceiverInfo(DeviceInfo),
    Disconnect,
    Silent,
}

/// How the peer answers `send:vid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferReply {
    Accept,
    Reject,
    Disconnect,
    Silent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedPeer {
    pub handshake: HandshakeReply,
    pub transfer: TransferReply,
    pub latency: Duration,
}

impl ScriptedPeer {
    /// A peer that introduces itself as `info` and accepts every credential.
    pub fn accepting(info: DeviceInfo) -> Self {
        Self {
            handshake: HandshakeReply::ReceiverInfo(info),
            transfer: TransferReply::Accept,
            latency: Duration::from_millis(20),
        }
    }

    pub fn with_handshake(mut self, reply: HandshakeReply) -> Self {
        self.handshake = reply;
        self
    }

    pub fn with_transfer(mut self, reply: TransferReply) -> Self {
        self.transfer = reply;
        self
    }
}

impl Default for ScriptedPeer {
    fn default() -> Self {
        Self::accepting(DeviceInfo::new("Verifier", "Loopback peer"))
    }
}

/// Listener bookkeeping, used to check that registrations and removals pair up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub nearby_registered: usize,
    pub nearby_removed: usize,
    pub log_registered: usize,
    pub log_removed: usize,
    pub destroy_calls: usize,
    pub connections_created: usize,
}

impl TransportStats {
    pub fn live_nearby(&self) -> usize {
        self.nearby_registered - self.nearby_removed
    }

    pub fn live_log(&self) -> usize {
        self.log_registered - self.log_removed
    }
}

struct Inner {
    peer: ScriptedPeer,
    parameters: Option<ConnectionDescriptor>,
    connected: bool,
    next_id: u64,
    nearby: HashMap<u64, NearbyEventHandler>,
    logs: HashMap<u64, LogEventHandler>,
    sent: Vec<String>,
    stats: TransportStats,
}

/// In-process transport. Clones share the same connection.
#[derive(Clone)]
pub struct LoopbackTransport {
    inner: Arc<Mutex<Inner>>,
}

impl LoopbackTransport {
    pub fn new(peer: ScriptedPeer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                peer,
                parameters: None,
                connected: false,
                next_id: 0,
                nearby: HashMap::new(),
                logs: HashMap::new(),
                sent: Vec::new(),
                stats: TransportStats::default(),
            })),
        }
    }

    pub fn set_peer(&self, peer: ScriptedPeer) {
        lock(&self.inner).peer = peer;
    }

    pub fn stats(&self) -> TransportStats {
        lock(&self.inner).stats
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.inner).connected
    }

    pub fn parameters(&self) -> Option<ConnectionDescriptor> {
        lock(&self.inner).parameters.clone()
    }

    /// Every payload sent so far, oldest first.
    pub fn sent_messages(&self) -> Vec<String> {
        lock(&self.inner).sent.clone()
    }

    /// Delivers `event` to the current nearby subscribers right away.
    pub fn emit(&self, event: TransportEvent) {
        let handlers: Vec<NearbyEventHandler> = {
            let mut inner = lock(&self.inner);
            if event == TransportEvent::Disconnected {
                inner.connected = false;
            }
            inner.nearby.values().cloned().collect()
        };
        for handler in handlers {
            handler(event.clone());
        }
    }

    fn log(&self, line: Value) {
        let handlers: Vec<LogEventHandler> = lock(&self.inner).logs.values().cloned().collect();
        for handler in handlers {
            handler(line.clone());
        }
    }

    fn schedule(&self, event: TransportEvent, latency: Duration) {
        let transport = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            transport.emit(event);
        });
    }

    fn answer(&self, peer: &ScriptedPeer, envelope: &Envelope) -> anyhow::Result<()> {
        let reply = match (envelope.message_type(), &peer.handshake, peer.transfer) {
            (Some(MessageType::SenderInfo), HandshakeReply::ReceiverInfo(info), _) => Some(
                TransportEvent::message(Envelope::new(MessageType::ReceiverInfo, info).to_wire()?),
            ),
            (Some(MessageType::SenderInfo), HandshakeReply::Disconnect, _) => {
                Some(TransportEvent::Disconnected)
            }
            (Some(MessageType::SendVid), _, TransferReply::Accept) => Some(TransportEvent::message(
                Envelope::new(MessageType::SendVidResponse, TransferResponse::accepted()).to_wire()?,
            )),
            (Some(MessageType::SendVid), _, TransferReply::Reject) => Some(TransportEvent::message(
                Envelope::new(MessageType::SendVidResponse, TransferResponse::rejected()).to_wire()?,
            )),
            (Some(MessageType::SendVid), _, TransferReply::Disconnect) => {
                Some(TransportEvent::Disconnected)
            }
            _ => None,
        };

        match reply {
            Some(event) => self.schedule(event, peer.latency),
            None => debug!(kind = envelope.kind(), "loopback peer stays silent"),
        }
        Ok(())
    }
}

#[async_trait]
impl TransportPort for LoopbackTransport {
    async fn destroy_connection(&self) -> anyhow::Result<()> {
        let was_connected = {
            let mut inner = lock(&self.inner);
            inner.stats.destroy_calls += 1;
            std::mem::replace(&mut inner.connected, false)
        };
        if !was_connected {
            bail!("no active connection to destroy");
        }
        self.log(json!({ "event": "destroyConnection" }));
        Ok(())
    }

    async fn set_connection_parameters(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> anyhow::Result<()> {
        lock(&self.inner).parameters = Some(descriptor.clone());
        self.log(json!({ "event": "setConnectionParameters", "cid": descriptor.connection_id() }));
        Ok(())
    }

    async fn create_connection(&self, role: ConnectionRole) -> anyhow::Result<()> {
        let latency = {
            let inner = lock(&self.inner);
            if inner.parameters.is_none() {
                return Err(anyhow!("connection parameters not set"));
            }
            inner.peer.latency
        };
        tokio::time::sleep(latency).await;

        {
            let mut inner = lock(&self.inner);
            inner.connected = true;
            inner.stats.connections_created += 1;
        }
        self.log(json!({ "event": "connected", "role": role.as_str() }));
        Ok(())
    }

    async fn send(&self, payload: String) -> anyhow::Result<()> {
        let peer = {
            let mut inner = lock(&self.inner);
            if !inner.connected {
                bail!("send without an active connection");
            }
            inner.sent.push(payload.clone());
            inner.peer.clone()
        };
        self.log(json!({ "event": "send", "bytes": payload.len() }));

        let envelope = Envelope::from_wire(&payload)?;
        self.answer(&peer, &envelope)
    }

    fn subscribe_nearby_events(&self, handler: NearbyEventHandler) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.nearby.insert(id, handler);
            inner.stats.nearby_registered += 1;
            id
        };
        let inner = Arc::clone(&self.inner);
        Subscription::new("nearby-events", move || {
            let mut inner = lock(&inner);
            if inner.nearby.remove(&id).is_some() {
                inner.stats.nearby_removed += 1;
            }
        })
    }

    fn subscribe_log_events(&self, handler: LogEventHandler) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.logs.insert(id, handler);
            inner.stats.log_registered += 1;
            id
        };
        let inner = Arc::clone(&self.inner);
        Subscription::new("log-events", move || {
            let mut inner = lock(&inner);
            if inner.logs.remove(&id).is_some() {
                inner.stats.log_removed += 1;
            }
        })
    }
}
