//! Tracing configuration for vidshare
//!
//! ## Behavior / 行为
//!
//! - **Development**: debug level, stdout
//! - **Production**: info level, stdout
//! - **Environment filter**: respects `RUST_LOG`
//!
//! Output goes through a non-blocking writer; its guard lives for the whole
//! process so buffered lines are flushed on exit.

use std::{io, sync::OnceLock};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives when `RUST_LOG` is unset.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("vs_app={level}"),
        format!("vs_platform={level}"),
    ]
}

/// Initialize the global tracing subscriber.
///
/// Call once from `main`, before the scan runtime starts.
///
/// # Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_directives(is_development()).join(",")));

    let (writer, guard) = tracing_appender::non_blocking(io::stdout());
    if LOG_GUARD.set(guard).is_err() {
        eprintln!("Log guard already initialized");
    }

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(writer);

    registry().with(env_filter).with(stdout_layer).try_init()?;
    Ok(())
}
