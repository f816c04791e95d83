/// Errors produced by the scan runtime itself.
///
/// Port failures never surface here; the runtime maps them to machine events.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scan runtime stopped")]
    Stopped,
    #[error("scan runtime dropped the reply")]
    ReplyDropped,
}
