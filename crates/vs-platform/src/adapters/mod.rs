//! # Platform Adapters / 平台适配器
//!
//! In-process implementations for every vidshare port.
//! 所有 vidshare 端口的进程内实现。
//!
//! # Modules / 模块
//!
//! - `transport` - Loopback proximity transport with a scripted peer
//! - `environment` - Controllable airplane mode, location service and permission
//! - `activity_log` - In-memory activity log
//! - `device` - Static local device info
//! - `credential_source` - In-memory shareable credentials
//! - `clock` - System clock

pub mod activity_log;
pub mod clock;
pub mod credential_source;
pub mod device;
pub mod environment;
pub mod transport;

pub use activity_log::InMemoryActivityLog;
pub use clock::SystemClock;
pub use credential_source::InMemoryCredentialSource;
pub use device::StaticDeviceInfo;
pub use environment::{ControllableEnvironment, EnvironmentStats};
pub use transport::{HandshakeReply, LoopbackTransport, ScriptedPeer, TransferReply, TransportStats};
