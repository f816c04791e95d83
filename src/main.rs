use anyhow::Context;
use tracing::{error, info};
use vidshare_lib::bootstrap::tracing::init_tracing_subscriber;
use vidshare_lib::{load_or_default, resolve_config_path, run_demo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing_subscriber().context("Failed to initialize tracing")?;

    let config_path = resolve_config_path();
    let config = load_or_default(config_path.as_deref())?;
    info!(device_name = %config.device_name, "configuration loaded");

    match run_demo(config).await {
        Ok(shared) => {
            info!(shared, "demo session complete");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "demo session failed");
            Err(err)
        }
    }
}
