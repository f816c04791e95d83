mod deps;
mod error;
mod handle;
mod listeners;
mod orchestrator;
mod scopes;
mod screen;

pub use deps::ScanDeps;
pub use error::ScanError;
pub use handle::ScanHandle;
pub use orchestrator::ScanOrchestrator;
pub use screen::{ScanScreenModel, ScanScreenView};
