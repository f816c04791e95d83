//! Scanned token validation.
//!
//! A token is the JSON text encoded in the peer's QR code. It must parse to an
//! object that carries a connection id (`cid`) and a public key (`pk`). Any
//! other field is ignored. The key is not checked cryptographically here; the
//! transport does that once connected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const CONNECTION_ID_FIELD: &str = "cid";
const PUBLIC_KEY_FIELD: &str = "pk";

/// Errors produced while validating a scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not valid JSON: {0}")]
    Malformed(String),

    #[error("token is not a JSON object")]
    NotAnObject,

    #[error("token is missing field `{0}`")]
    MissingField(&'static str),

    #[error("token field `{0}` must be a non-empty string")]
    InvalidField(&'static str),
}

/// Parsed `{cid, pk}` pair, sufficient to attempt a connection.
///
/// Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    #[serde(rename = "cid")]
    connection_id: String,
    #[serde(rename = "pk")]
    public_key: String,
}

impl ConnectionDescriptor {
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

/// Validates a scanned payload and extracts its connection descriptor.
///
/// Stricter than a presence check: `cid` and `pk` must be non-empty strings,
/// so `{"cid":1,"pk":2}` is refused with [`TokenError::InvalidField`].
pub fn validate_token(raw: &str) -> Result<ConnectionDescriptor, TokenError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| TokenError::Malformed(err.to_string()))?;
    let object = value.as_object().ok_or(TokenError::NotAnObject)?;

    let connection_id = required_string(object, CONNECTION_ID_FIELD)?;
    let public_key = required_string(object, PUBLIC_KEY_FIELD)?;

    Ok(ConnectionDescriptor {
        connection_id,
        public_key,
    })
}

fn required_string(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, TokenError> {
    match object.get(field) {
        None => Err(TokenError::MissingField(field)),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(_) => Err(TokenError::InvalidField(field)),
    }
}
