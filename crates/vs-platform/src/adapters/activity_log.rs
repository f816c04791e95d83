use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;
use vs_core::ports::ActivityLogPort;
use vs_core::ActivityLogEntry;

use crate::sync::lock;

/// Activity log kept in memory, newest entry last.
#[derive(Debug, Default)]
pub struct InMemoryActivityLog {
    entries: Mutex<Vec<ActivityLogEntry>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ActivityLogEntry> {
        lock(&self.entries).clone()
    }
}

#[async_trait]
impl ActivityLogPort for InMemoryActivityLog {
    async fn append(&self, entry: ActivityLogEntry) -> anyhow::Result<()> {
        info!(
            key = %entry.key,
            device_name = %entry.device_name,
            label = %entry.label,
            "activity recorded"
        );
        lock(&self.entries).push(entry);
        Ok(())
    }
}
