use async_trait::async_trait;

use crate::credential::ActivityLogEntry;

/// Sink for activity entries emitted after an accepted transfer.
///
/// 分享成功后写入活动记录的端口。
///
/// Fire-and-forget from the orchestrator's perspective: a failed write is
/// logged and never affects the transfer.
#[async_trait]
pub trait ActivityLogPort: Send + Sync {
    async fn append(&self, entry: ActivityLogEntry) -> anyhow::Result<()>;
}
