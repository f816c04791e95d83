pub mod config;
pub mod demo;
pub mod tracing;

pub use config::{load_config, load_or_default, resolve_config_path};
pub use demo::run_demo;
