use serde::{Deserialize, Serialize};

/// Events delivered by the proximity transport to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransportEvent {
    #[serde(rename = "onDisconnected")]
    Disconnected,

    /// An inbound serialized envelope.
    #[serde(rename = "msg")]
    Message { data: String },

    /// Any other lifecycle notification; only logged.
    #[serde(other)]
    Other,
}

impl TransportEvent {
    pub fn message(data: impl Into<String>) -> Self {
        Self::Message { data: data.into() }
    }
}
