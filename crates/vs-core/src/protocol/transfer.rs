use serde::{Deserialize, Serialize};

pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

/// Payload of a `send:vid:response` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub status: String,
}

impl TransferResponse {
    pub fn accepted() -> Self {
        Self {
            status: STATUS_ACCEPTED.to_string(),
        }
    }

    pub fn rejected() -> Self {
        Self {
            status: STATUS_REJECTED.to_string(),
        }
    }

    /// Only an exact `"accepted"` counts as acceptance.
    pub fn outcome(&self) -> TransferOutcome {
        if self.status == STATUS_ACCEPTED {
            TransferOutcome::Accepted
        } else {
            TransferOutcome::Rejected
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    Accepted,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anything_but_accepted_is_a_rejection() {
        assert_eq!(TransferResponse::accepted().outcome(), TransferOutcome::Accepted);
        assert_eq!(TransferResponse::rejected().outcome(), TransferOutcome::Rejected);
        for status in ["", "Accepted", "ACCEPTED", "pending"] {
            let response = TransferResponse {
                status: status.to_string(),
            };
            assert_eq!(response.outcome(), TransferOutcome::Rejected, "{status}");
        }
    }
}
