use std::time::Duration;

/// Wait after destroying a connection. The transport reports no completion.
pub const CONNECTION_SETTLE_DELAY: Duration = Duration::from_millis(250);

/// Wait before requesting location permission so an OS settings sheet can
/// finish closing.
pub const PERMISSION_SETTLE_DELAY: Duration = Duration::from_millis(250);
