//! Wire protocol between the two devices.
//!
//! Every message is an [`Envelope`] `{type, data}` serialized as JSON text and
//! carried opaquely by the proximity transport. The dotted `type` tag is the
//! dispatch discriminant.

mod envelope;
mod inbound;
mod transfer;
mod transport_event;

pub use envelope::{Envelope, EnvelopeError, MessageType};
pub use inbound::{decode_inbound, InboundSignal, ProtocolPhase};
pub use transfer::{TransferOutcome, TransferResponse};
pub use transport_event::TransportEvent;
