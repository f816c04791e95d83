//! # vs-platform
//!
//! In-process implementations of the vidshare ports.
//!
//! The adapters stand in for the mobile platform services: a loopback
//! transport with a scripted peer, a controllable OS environment, and
//! in-memory stores. The host demo and the integration tests wire them into
//! the scan orchestrator.

pub mod adapters;
mod sync;

pub use adapters::{
    ControllableEnvironment, EnvironmentStats, HandshakeReply, InMemoryActivityLog,
    InMemoryCredentialSource, LoopbackTransport, ScriptedPeer, StaticDeviceInfo, SystemClock,
    TransferReply, TransportStats,
};
