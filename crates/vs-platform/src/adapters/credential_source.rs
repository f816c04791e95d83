use std::sync::Mutex;

use async_trait::async_trait;
use vs_core::ports::CredentialSourcePort;
use vs_core::Credential;

use crate::sync::lock;

/// Shareable credentials held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialSource {
    credentials: Mutex<Vec<Credential>>,
}

impl InMemoryCredentialSource {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }

    pub fn replace(&self, credentials: Vec<Credential>) {
        *lock(&self.credentials) = credentials;
    }
}

#[async_trait]
impl CredentialSourcePort for InMemoryCredentialSource {
    async fn list_shareable(&self) -> anyhow::Result<Vec<Credential>> {
        Ok(lock(&self.credentials).clone())
    }
}
