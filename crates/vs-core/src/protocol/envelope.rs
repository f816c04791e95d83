use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode envelope: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("envelope `{kind}` carries an unexpected payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Known envelope tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Scanner → peer: the scanner's device info.
    SenderInfo,
    /// Peer → scanner: the peer's device info.
    ReceiverInfo,
    /// Scanner → peer: the selected credential.
    SendVid,
    /// Peer → scanner: accept/reject verdict.
    SendVidResponse,
}

impl MessageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SenderInfo => "exchange:sender-info",
            Self::ReceiverInfo => "exchange:receiver-info",
            Self::SendVid => "send:vid",
            Self::SendVidResponse => "send:vid:response",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "exchange:sender-info" => Some(Self::SenderInfo),
            "exchange:receiver-info" => Some(Self::ReceiverInfo),
            "send:vid" => Some(Self::SendVid),
            "send:vid:response" => Some(Self::SendVidResponse),
            _ => None,
        }
    }
}

/// Tagged message unit multiplexed over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(rename = "type")]
    kind: String,
    data: T,
}

impl<T> Envelope<T> {
    pub fn new(kind: MessageType, data: T) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            data,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// `None` for tags this version does not know.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::parse(&self.kind)
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_wire(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string(self).map_err(EnvelopeError::Encode)
    }
}

impl Envelope<Value> {
    /// Decodes the outer `{type, data}` frame, leaving the payload untyped.
    pub fn from_wire(raw: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(raw).map_err(EnvelopeError::Decode)
    }

    /// Decodes the payload into its concrete type.
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        let kind = self.kind;
        serde_json::from_value(self.data).map_err(|source| EnvelopeError::Payload { kind, source })
    }
}
