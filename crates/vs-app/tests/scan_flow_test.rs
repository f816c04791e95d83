//! End-to-end scan sessions against the in-process platform adapters.
//!
//! Time is paused, so the 250 ms settle delays and the peer latency run in
//! virtual time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use vs_app::{ScanDeps, ScanHandle, ScanOrchestrator, ScanScreenView};
use vs_core::credential::ActivityAction;
use vs_core::ports::ActivityLogPort;
use vs_core::scan::{FlightState, LocationState, ReviewState};
use vs_core::{
    ActivityLogEntry, AppConfig, Credential, DeviceInfo, Envelope, MessageType, PermissionStatus,
    ScanSnapshot, ScanState, TransportEvent,
};
use vs_platform::{
    ControllableEnvironment, HandshakeReply, InMemoryActivityLog, InMemoryCredentialSource,
    LoopbackTransport, ScriptedPeer, StaticDeviceInfo, SystemClock, TransferReply,
};

const VALID_TOKEN: &str = r#"{"cid":"conn-42","pk":"pk-42"}"#;

mock! {
    ActivityLog {}

    #[async_trait]
    impl ActivityLogPort for ActivityLog {
        async fn append(&self, entry: ActivityLogEntry) -> anyhow::Result<()>;
    }
}

struct Session {
    handle: ScanHandle,
    transport: LoopbackTransport,
    env: ControllableEnvironment,
}

fn start(
    peer: ScriptedPeer,
    env: ControllableEnvironment,
    activity_log: Arc<dyn ActivityLogPort>,
) -> Session {
    let transport = LoopbackTransport::new(peer);
    let deps = ScanDeps {
        transport: Arc::new(transport.clone()),
        airplane: Arc::new(env.clone()),
        location: Arc::new(env.clone()),
        permission: Arc::new(env.clone()),
        settings: Arc::new(env.clone()),
        device_info: Arc::new(StaticDeviceInfo::new(DeviceInfo::new("Holder", "Test phone"))),
        activity_log,
        clock: Arc::new(SystemClock),
    };
    let config = AppConfig {
        device_name: "test-phone".to_string(),
        ..AppConfig::default()
    };
    Session {
        handle: ScanOrchestrator::spawn(deps, config),
        transport,
        env,
    }
}

fn default_session() -> Session {
    start(
        ScriptedPeer::default(),
        ControllableEnvironment::new(),
        Arc::new(InMemoryActivityLog::new()),
    )
}

async fn reach(handle: &ScanHandle, state: ScanState) -> ScanSnapshot {
    tokio::time::timeout(Duration::from_secs(5), handle.wait_for(|s| s.state == state))
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {}", state.path()))
        .expect("scan runtime stopped")
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

async fn reach_review(session: &Session) -> ScanSnapshot {
    session.handle.screen_focus().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;
    session.handle.scan(VALID_TOKEN).await.unwrap();
    reach(&session.handle, ScanState::Reviewing(ReviewState::Idle)).await
}

#[tokio::test(start_paused = true)]
async fn focus_runs_preflight_and_waits_for_a_scan() {
    let session = default_session();

    let snapshot = session.handle.screen_focus().await.unwrap();
    assert_eq!(
        snapshot.state,
        ScanState::CheckingAirplaneMode(FlightState::CheckingStatus)
    );

    let snapshot = reach(&session.handle, ScanState::FindingConnection).await;
    assert!(snapshot.is_scanning());
    assert!(snapshot.remediation().is_empty());

    let env_stats = session.env.stats();
    assert_eq!(env_stats.airplane_queries, 1);
    assert_eq!(env_stats.permission_requests, 1);
    assert_eq!(env_stats.live_location_listeners, 0);

    let stats = session.transport.stats();
    assert_eq!(stats.live_nearby(), 1);
    assert_eq!(stats.live_log(), 1);
}

#[tokio::test(start_paused = true)]
async fn accepted_share_logs_once_and_navigates_home() {
    let log = Arc::new(InMemoryActivityLog::new());
    let session = start(
        ScriptedPeer::default(),
        ControllableEnvironment::new(),
        log.clone(),
    );

    let snapshot = reach_review(&session).await;
    assert_eq!(
        snapshot.receiver_info().map(DeviceInfo::display_name),
        Some("Verifier")
    );
    assert_eq!(
        session.transport.parameters().map(|d| d.connection_id().to_string()),
        Some("conn-42".to_string())
    );

    session.handle.update_reason("testing").await.unwrap();
    let snapshot = session.handle.accept_request().await.unwrap();
    assert!(snapshot.is_selecting_credential());

    let snapshot = session
        .handle
        .select_credential(Credential::new("vid-7", "gym"))
        .await
        .unwrap();
    assert!(snapshot.is_sending_credential());

    reach(&session.handle, ScanState::Reviewing(ReviewState::Accepted)).await;
    settle().await;

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "vid:vid-7");
    assert_eq!(entries[0].action, ActivityAction::Shared);
    assert_eq!(entries[0].device_name, "Verifier");
    assert_eq!(entries[0].label, "gym");

    let snapshot = session.handle.dismiss().await.unwrap();
    assert!(snapshot.should_navigate_home());
    assert_eq!(snapshot.reason(), "");
    assert!(snapshot.context.selected.is_none());
    assert!(!session.transport.is_connected());

    settle().await;
    assert_eq!(log.entries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn transferred_record_carries_reason_and_no_previous_tag() {
    let session = default_session();
    reach_review(&session).await;

    session.handle.update_reason("age check").await.unwrap();
    session.handle.accept_request().await.unwrap();
    let mut credential = Credential::new("vid-9", "shared before");
    credential
        .extra
        .insert("issuer".to_string(), serde_json::json!("city"));
    session.handle.select_credential(credential).await.unwrap();
    reach(&session.handle, ScanState::Reviewing(ReviewState::Accepted)).await;

    let sent = session.transport.sent_messages();
    assert_eq!(sent.len(), 2);

    let handshake = Envelope::from_wire(&sent[0]).unwrap();
    assert_eq!(handshake.message_type(), Some(MessageType::SenderInfo));
    let sender: DeviceInfo = handshake.decode_data().unwrap();
    assert_eq!(sender.display_name(), "Holder");

    let transfer = Envelope::from_wire(&sent[1]).unwrap();
    assert_eq!(transfer.message_type(), Some(MessageType::SendVid));
    let record: Credential = transfer.decode_data().unwrap();
    assert_eq!(record.id, "vid-9");
    assert_eq!(record.tag, "");
    assert_eq!(record.reason.as_deref(), Some("age check"));
    assert_eq!(record.extra.get("issuer"), Some(&serde_json::json!("city")));
}

#[tokio::test(start_paused = true)]
async fn rejected_share_writes_no_activity() {
    let log = Arc::new(InMemoryActivityLog::new());
    let session = start(
        ScriptedPeer::default().with_transfer(TransferReply::Reject),
        ControllableEnvironment::new(),
        log.clone(),
    );
    reach_review(&session).await;

    session.handle.accept_request().await.unwrap();
    session
        .handle
        .select_credential(Credential::new("vid-1", ""))
        .await
        .unwrap();
    let snapshot = reach(&session.handle, ScanState::Reviewing(ReviewState::Rejected)).await;
    assert!(snapshot.is_rejected());

    settle().await;
    assert!(log.entries().is_empty());

    let snapshot = session.handle.dismiss().await.unwrap();
    assert_eq!(snapshot.state, ScanState::FindingConnection);
}

#[tokio::test(start_paused = true)]
async fn invalid_code_is_reported_then_dismissed() {
    let session = default_session();
    session.handle.screen_focus().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;

    let snapshot = session.handle.scan(r#"{"cid":"only-id"}"#).await.unwrap();
    assert!(snapshot.is_invalid());
    assert_eq!(snapshot.status_message(), "Invalid QR Code");
    assert_eq!(session.transport.parameters(), None);

    let snapshot = session.handle.dismiss().await.unwrap();
    assert_eq!(snapshot.state, ScanState::FindingConnection);
}

#[tokio::test(start_paused = true)]
async fn peer_disconnect_during_handshake_is_reported() {
    let session = start(
        ScriptedPeer::default().with_handshake(HandshakeReply::Disconnect),
        ControllableEnvironment::new(),
        Arc::new(InMemoryActivityLog::new()),
    );
    session.handle.screen_focus().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;
    session.handle.scan(VALID_TOKEN).await.unwrap();

    let snapshot = reach(&session.handle, ScanState::Disconnected).await;
    assert!(snapshot.is_disconnected());
    assert_eq!(snapshot.receiver_info(), None);

    let snapshot = session.handle.dismiss().await.unwrap();
    assert_eq!(snapshot.state, ScanState::FindingConnection);
    assert_eq!(session.transport.stats().live_nearby(), 1);
}

#[tokio::test(start_paused = true)]
async fn peer_disconnect_during_transfer_clears_review() {
    let session = start(
        ScriptedPeer::default().with_transfer(TransferReply::Disconnect),
        ControllableEnvironment::new(),
        Arc::new(InMemoryActivityLog::new()),
    );
    reach_review(&session).await;
    session.handle.update_reason("testing").await.unwrap();
    session.handle.accept_request().await.unwrap();
    session
        .handle
        .select_credential(Credential::new("vid-3", ""))
        .await
        .unwrap();

    let snapshot = reach(&session.handle, ScanState::Disconnected).await;
    assert_eq!(snapshot.reason(), "");
    assert!(snapshot.context.selected.is_none());
    // The peer already dropped the link; destroying it again is harmless.
    assert!(!session.transport.is_connected());
    assert!(session.transport.stats().destroy_calls >= 2);
}

#[tokio::test(start_paused = true)]
async fn cancelled_review_forgets_the_reason() {
    let session = default_session();
    reach_review(&session).await;

    let snapshot = session.handle.update_reason("testing").await.unwrap();
    assert_eq!(snapshot.reason(), "testing");

    let snapshot = session.handle.cancel().await.unwrap();
    assert_eq!(snapshot.state, ScanState::FindingConnection);
    assert_eq!(snapshot.reason(), "");
    assert!(!session.transport.is_connected());

    // A second session starts without the old reason.
    session.handle.scan(VALID_TOKEN).await.unwrap();
    let snapshot = reach(&session.handle, ScanState::Reviewing(ReviewState::Idle)).await;
    assert_eq!(snapshot.reason(), "");
}

#[tokio::test(start_paused = true)]
async fn at_most_one_listener_set_across_sessions() {
    let session = default_session();
    for _ in 0..3 {
        reach_review(&session).await;
        session.handle.cancel().await.unwrap();

        let stats = session.transport.stats();
        assert_eq!(stats.live_nearby(), 1);
        assert_eq!(stats.live_log(), 1);
    }

    let snapshot = session.handle.screen_blur().await.unwrap();
    assert_eq!(snapshot.state, ScanState::Inactive);
    let stats = session.transport.stats();
    assert_eq!(stats.live_nearby(), 0);
    assert_eq!(stats.live_log(), 0);
    assert_eq!(session.env.stats().live_location_listeners, 0);
}

#[tokio::test(start_paused = true)]
async fn blur_drops_results_of_abandoned_work() {
    let session = default_session();
    session.handle.screen_focus().await.unwrap();
    reach(
        &session.handle,
        ScanState::CheckingLocationService(LocationState::CheckingPermission),
    )
    .await;

    session.handle.screen_blur().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(session.handle.snapshot().state, ScanState::Inactive);
    assert_eq!(session.env.stats().permission_requests, 0);
}

#[tokio::test(start_paused = true)]
async fn airplane_mode_blocks_until_disabled() {
    let env = ControllableEnvironment::new();
    env.set_airplane_enabled(true);
    let session = start(
        ScriptedPeer::default(),
        env,
        Arc::new(InMemoryActivityLog::new()),
    );

    session.handle.screen_focus().await.unwrap();
    let snapshot = reach(
        &session.handle,
        ScanState::CheckingAirplaneMode(FlightState::Enabled),
    )
    .await;
    assert!(snapshot.is_airplane_enabled());
    assert_eq!(snapshot.remediation().button, "Disable flight mode");

    session.handle.flight_request().await.unwrap();
    settle().await;
    assert_eq!(session.env.stats().airplane_disable_requests, 1);

    session.handle.app_active().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;
}

#[tokio::test(start_paused = true)]
async fn declined_location_resolution_can_be_retried() {
    let env = ControllableEnvironment::new();
    env.set_location_enabled(false);
    env.answer_next_resolution(false);
    let session = start(
        ScriptedPeer::default(),
        env,
        Arc::new(InMemoryActivityLog::new()),
    );

    session.handle.screen_focus().await.unwrap();
    let snapshot = reach(
        &session.handle,
        ScanState::CheckingLocationService(LocationState::Disabled),
    )
    .await;
    assert!(snapshot.is_location_disabled());

    session.handle.location_request().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;
    assert_eq!(session.env.stats().resolution_requests, 2);
}

#[tokio::test(start_paused = true)]
async fn denied_permission_recovers_from_settings() {
    let env = ControllableEnvironment::new();
    env.set_permission(PermissionStatus::NeverAskAgain);
    env.grant_from_settings(PermissionStatus::Granted);
    let session = start(
        ScriptedPeer::default(),
        env,
        Arc::new(InMemoryActivityLog::new()),
    );

    session.handle.screen_focus().await.unwrap();
    let snapshot = reach(
        &session.handle,
        ScanState::CheckingLocationService(LocationState::Denied),
    )
    .await;
    assert!(snapshot.is_location_denied());

    session.handle.location_request().await.unwrap();
    settle().await;
    assert_eq!(session.env.stats().settings_opened, 1);

    session.handle.app_active().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;
}

#[tokio::test(start_paused = true)]
async fn unsolicited_peer_messages_are_ignored_while_scanning() {
    let session = default_session();
    session.handle.screen_focus().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;

    let wire = Envelope::new(MessageType::ReceiverInfo, DeviceInfo::new("Stray", ""))
        .to_wire()
        .unwrap();
    session.transport.emit(TransportEvent::message(wire));
    session.transport.emit(TransportEvent::Disconnected);
    settle().await;

    assert_eq!(session.handle.snapshot().state, ScanState::FindingConnection);
}

#[tokio::test(start_paused = true)]
async fn accepted_share_appends_exactly_one_entry() {
    let appended = Arc::new(AtomicUsize::new(0));
    let counter = appended.clone();
    let mut activity_log = MockActivityLog::new();
    activity_log
        .expect_append()
        .withf(|entry| entry.action == ActivityAction::Shared && entry.label == "vid-5")
        .returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

    let session = start(
        ScriptedPeer::default(),
        ControllableEnvironment::new(),
        Arc::new(activity_log),
    );
    reach_review(&session).await;
    session.handle.accept_request().await.unwrap();
    session
        .handle
        .select_credential(Credential::new("vid-5", ""))
        .await
        .unwrap();
    reach(&session.handle, ScanState::Reviewing(ReviewState::Accepted)).await;

    // Repeated acceptance requests never resend.
    session.handle.accept_request().await.unwrap();
    session.handle.dismiss().await.unwrap();
    session.handle.dismiss().await.unwrap();
    settle().await;

    assert_eq!(appended.load(Ordering::SeqCst), 1);
    assert_eq!(session.transport.sent_messages().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn failing_activity_log_does_not_affect_the_session() {
    let mut activity_log = MockActivityLog::new();
    activity_log
        .expect_append()
        .returning(|_| Err(anyhow::anyhow!("store unavailable")));

    let session = start(
        ScriptedPeer::default(),
        ControllableEnvironment::new(),
        Arc::new(activity_log),
    );
    reach_review(&session).await;
    session.handle.accept_request().await.unwrap();
    session
        .handle
        .select_credential(Credential::new("vid-6", ""))
        .await
        .unwrap();
    reach(&session.handle, ScanState::Reviewing(ReviewState::Accepted)).await;
    settle().await;

    assert!(session.handle.snapshot().is_accepted());
}

#[tokio::test(start_paused = true)]
async fn screen_view_reports_empty_and_dismisses_invalid_only() {
    let session = default_session();
    let credentials = Arc::new(InMemoryCredentialSource::new(Vec::new()));
    let view = ScanScreenView::new(session.handle.clone(), credentials.clone());
    assert!(view.is_empty().await);

    credentials.replace(vec![Credential::new("vid-1", "")]);
    assert!(!view.is_empty().await);

    session.handle.screen_focus().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;
    assert_eq!(view.dismiss_invalid().await.unwrap(), None);

    session.handle.scan("not json").await.unwrap();
    assert!(view.model().invalid);
    let snapshot = view.dismiss_invalid().await.unwrap().unwrap();
    assert_eq!(snapshot.state, ScanState::FindingConnection);
}

#[tokio::test(start_paused = true)]
async fn shutdown_removes_every_listener() {
    let session = default_session();
    session.handle.screen_focus().await.unwrap();
    reach(&session.handle, ScanState::FindingConnection).await;

    session.handle.shutdown().await.unwrap();
    let stats = session.transport.stats();
    assert_eq!(stats.live_nearby(), 0);
    assert_eq!(stats.live_log(), 0);
    assert!(session.handle.screen_focus().await.is_err());
}
