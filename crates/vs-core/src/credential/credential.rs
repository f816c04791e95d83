use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of the stable per-credential store key.
pub const CREDENTIAL_STORE_KEY_PREFIX: &str = "vid:";

/// An opaque, user-selectable identity record.
///
/// The core only looks at `id`, the display `tag` (its sharing annotation) and
/// the transient `reason`; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Stable key identifying this credential in the local store.
    pub fn store_key(&self) -> String {
        format!("{CREDENTIAL_STORE_KEY_PREFIX}{}", self.id)
    }

    /// Display label: the tag, or the id when untagged.
    pub fn label(&self) -> &str {
        if self.tag.is_empty() {
            &self.id
        } else {
            &self.tag
        }
    }
}

/// A credential chosen for sharing, stamped with the reason accumulated
/// during review.
///
/// Consumed once by the transfer; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedCredential {
    credential: Credential,
    reason: String,
}

impl SelectedCredential {
    pub fn new(credential: Credential, reason: impl Into<String>) -> Self {
        Self {
            credential,
            reason: reason.into(),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The record as it goes on the wire: reason attached, any previous
    /// sharing tag cleared.
    pub fn to_transfer_record(&self) -> Credential {
        Credential {
            tag: String::new(),
            reason: Some(self.reason.clone()),
            ..self.credential.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_id() {
        assert_eq!(Credential::new("id-1", "Work").label(), "Work");
        assert_eq!(Credential::new("id-1", "").label(), "id-1");
    }

    #[test]
    fn transfer_record_is_clean_of_previous_tag() {
        let mut stored = Credential::new("id-1", "shared with Bob");
        stored.reason = Some("old reason".into());
        stored
            .extra
            .insert("credentialSubject".into(), Value::from("opaque"));

        let record = SelectedCredential::new(stored.clone(), "demo").to_transfer_record();

        assert_eq!(record.tag, "");
        assert_eq!(record.reason.as_deref(), Some("demo"));
        assert_eq!(record.id, stored.id);
        assert_eq!(record.extra, stored.extra);
    }

    #[test]
    fn store_key_is_stable() {
        let credential = Credential::new("1234", "");
        assert_eq!(credential.store_key(), "vid:1234");
        assert_eq!(credential.store_key(), credential.clone().store_key());
    }
}
