//! vidshare host
//!
//! Bootstraps logging and configuration and wires the in-process adapters
//! into the scan runtime.

pub mod bootstrap;

pub use bootstrap::{load_config, load_or_default, resolve_config_path, run_demo};
