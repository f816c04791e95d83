//! Use cases
//! 每个用例拥有自己的运行时：状态机是纯的，副作用都在这里执行。
//!
//! [Scan screen]
//         ↓
// ScanHandle (events)  →  ScanOrchestrator (single queue)
//         ↓                       ↓
// ScanScreenView  ←  ScanSnapshot (watch)

pub mod scan;

pub use scan::{ScanDeps, ScanError, ScanHandle, ScanOrchestrator, ScanScreenView};
