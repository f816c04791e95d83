use async_trait::async_trait;

use crate::credential::Credential;

/// Supplies the credentials the user may pick from during review.
#[async_trait]
pub trait CredentialSourcePort: Send + Sync {
    async fn list_shareable(&self) -> anyhow::Result<Vec<Credential>>;
}
