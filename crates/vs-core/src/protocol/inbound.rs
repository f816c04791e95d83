//! Inbound dispatch for the two protocol phases.
//!
//! A phase only reacts to its own response tag and to peer disconnection.
//! Any other tag is a forward-compatible no-op.

use super::{Envelope, EnvelopeError, MessageType, TransferOutcome, TransferResponse, TransportEvent};
use crate::device::DeviceInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolPhase {
    /// Waiting for `exchange:receiver-info`.
    Handshake,
    /// Waiting for `send:vid:response`.
    Transfer,
}

/// What an inbound transport event means for the current phase.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundSignal {
    PeerDisconnected,
    PeerInfo(DeviceInfo),
    TransferCompleted(TransferOutcome),
}

/// Interprets a transport event within `phase`.
///
/// Returns `Ok(None)` for events the phase ignores. A malformed envelope is an
/// error so the caller can log it; it never changes state.
pub fn decode_inbound(
    phase: ProtocolPhase,
    event: &TransportEvent,
) -> Result<Option<InboundSignal>, EnvelopeError> {
    let raw = match event {
        TransportEvent::Disconnected => return Ok(Some(InboundSignal::PeerDisconnected)),
        TransportEvent::Message { data } => data,
        TransportEvent::Other => return Ok(None),
    };

    let envelope = Envelope::from_wire(raw)?;
    match (phase, envelope.message_type()) {
        (ProtocolPhase::Handshake, Some(MessageType::ReceiverInfo)) => {
            let info: DeviceInfo = envelope.decode_data()?;
            Ok(Some(InboundSignal::PeerInfo(info)))
        }
        (ProtocolPhase::Transfer, Some(MessageType::SendVidResponse)) => {
            let response: TransferResponse = envelope.decode_data()?;
            Ok(Some(InboundSignal::TransferCompleted(response.outcome())))
        }
        _ => Ok(None),
    }
}
