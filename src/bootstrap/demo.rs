//! Scripted end-to-end session over the in-process adapters.
//!
//! Walks one share from screen focus to the accepted transfer so the whole
//! runtime can be watched in the logs without a device.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tracing::{info, info_span, Instrument};
use vs_app::{ScanDeps, ScanHandle, ScanOrchestrator, ScanScreenView};
use vs_core::{AppConfig, Credential, DeviceInfo, ScanSnapshot};
use vs_platform::{
    ControllableEnvironment, InMemoryActivityLog, InMemoryCredentialSource, LoopbackTransport,
    ScriptedPeer, StaticDeviceInfo, SystemClock,
};

const STEP_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs one scripted share and returns the activity entries it produced.
pub async fn run_demo(config: AppConfig) -> anyhow::Result<usize> {
    let transport = LoopbackTransport::new(ScriptedPeer::accepting(DeviceInfo::new(
        "Verifier",
        "Loopback kiosk",
    )));
    let env = ControllableEnvironment::new();
    let activity_log = Arc::new(InMemoryActivityLog::new());
    let credentials = Arc::new(InMemoryCredentialSource::new(vec![
        Credential::new("vid-demo-1", ""),
        Credential::new("vid-demo-2", "library"),
    ]));

    let deps = ScanDeps {
        transport: Arc::new(transport),
        airplane: Arc::new(env.clone()),
        location: Arc::new(env.clone()),
        permission: Arc::new(env.clone()),
        settings: Arc::new(env),
        device_info: Arc::new(StaticDeviceInfo::new(DeviceInfo::new(
            config.device_name.clone(),
            config.device_name.clone(),
        ))),
        activity_log: activity_log.clone(),
        clock: Arc::new(SystemClock),
    };

    let handle = ScanOrchestrator::spawn(deps, config);
    let view = ScanScreenView::new(handle.clone(), credentials);

    let span = info_span!("demo.session");
    async {
        if view.is_empty().await {
            return Err(anyhow!("no shareable credentials"));
        }

        handle.screen_focus().await?;
        wait(&handle, "scanning", ScanSnapshot::is_scanning).await?;

        let token = serde_json::json!({ "cid": "demo-connection", "pk": "demo-public-key" });
        handle.scan(token.to_string()).await?;
        let snapshot = wait(&handle, "reviewing", ScanSnapshot::is_reviewing).await?;
        info!(
            receiver = snapshot.receiver_info().map(DeviceInfo::display_name).unwrap_or_default(),
            "peer ready for review"
        );

        handle.update_reason("demo").await?;
        handle.accept_request().await?;
        let credential = view
            .shareable_credentials()
            .await?
            .into_iter()
            .next()
            .context("credential list emptied during review")?;
        handle.select_credential(credential).await?;
        wait(&handle, "accepted", ScanSnapshot::is_accepted).await?;

        let snapshot = handle.dismiss().await?;
        info!(navigate_home = snapshot.should_navigate_home(), "share finished");

        handle.screen_blur().await?;
        handle.shutdown().await?;
        Ok::<(), anyhow::Error>(())
    }
    .instrument(span)
    .await?;

    // Appends are fire-and-forget; give the last one a moment to land.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(activity_log.entries().len())
}

async fn wait(
    handle: &ScanHandle,
    label: &str,
    predicate: fn(&ScanSnapshot) -> bool,
) -> anyhow::Result<ScanSnapshot> {
    tokio::time::timeout(STEP_TIMEOUT, handle.wait_for(predicate))
        .await
        .with_context(|| format!("timed out waiting for {label}"))?
        .map_err(Into::into)
}
