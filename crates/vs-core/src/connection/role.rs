use serde::{Deserialize, Serialize};

/// Role this device plays when opening a proximity connection.
///
/// The scanning side is always the discoverer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRole {
    Discoverer,
}

impl ConnectionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discoverer => "discoverer",
        }
    }
}
