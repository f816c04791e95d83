//! Scan orchestrator.
//!
//! Runs the scan state machine on a single event queue and executes its
//! actions against the platform ports. One event is processed to completion,
//! including every action of its transition, before the next is taken.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, info_span, warn, Instrument};
use vs_core::environment::LocationStatus;
use vs_core::ports::{LocationStatusHandler, NearbyEventHandler, Subscription, TransportPort};
use vs_core::protocol::{decode_inbound, ProtocolPhase};
use vs_core::scan::{CONNECTION_SETTLE_DELAY, PERMISSION_SETTLE_DELAY};
use vs_core::{
    ActivityLogEntry, AppConfig, ConnectionRole, DeviceInfo, Envelope, EnvelopeError, MessageType,
    ScanAction, ScanEvent, ScanSnapshot, ScanStateMachine, SelectedCredential,
};

use super::deps::ScanDeps;
use super::handle::ScanHandle;
use super::listeners::DiagnosticListeners;
use super::scopes::{ScopeToken, Scopes, TaskKind};

pub(crate) enum Command {
    /// Public event; answered with the snapshot taken after processing it.
    Dispatch {
        event: ScanEvent,
        reply: oneshot::Sender<ScanSnapshot>,
    },
    /// Result of a scoped task or subscription.
    Internal { scope: ScopeToken, event: ScanEvent },
    Shutdown { reply: oneshot::Sender<()> },
}

/// Posts events back into the queue on behalf of one scope.
///
/// Holds a weak sender so that outstanding tasks and listeners never keep a
/// stopped runtime's queue open.
#[derive(Clone)]
struct ScopedPoster {
    tx: mpsc::WeakUnboundedSender<Command>,
    scope: ScopeToken,
}

impl ScopedPoster {
    fn post(&self, event: ScanEvent) {
        if let Some(tx) = self.tx.upgrade() {
            // Fails only when the runtime has stopped.
            let _ = tx.send(Command::Internal {
                scope: self.scope,
                event,
            });
        }
    }
}

/// Entry point of the scan use case.
pub struct ScanOrchestrator;

impl ScanOrchestrator {
    /// Starts the scan runtime on the current tokio runtime.
    ///
    /// The machine starts `inactive`; the host drives it with
    /// [`ScanHandle::screen_focus`].
    pub fn spawn(deps: ScanDeps, config: AppConfig) -> ScanHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let machine = ScanStateMachine::new();
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());

        let runtime = ScanRuntime {
            diagnostics: DiagnosticListeners::new(config.device_name.as_str()),
            machine,
            deps,
            config: Arc::new(config),
            scopes: Scopes::new(),
            location_subscription: None,
            protocol_subscription: None,
            tx: tx.downgrade(),
            snapshot_tx,
        };
        tokio::spawn(runtime.run(rx));

        ScanHandle::new(tx, snapshot_rx)
    }
}

/// Sole owner of the machine, the connection's listener set and every scope.
struct ScanRuntime {
    machine: ScanStateMachine,
    deps: ScanDeps,
    config: Arc<AppConfig>,
    scopes: Scopes,
    diagnostics: DiagnosticListeners,
    location_subscription: Option<Subscription>,
    protocol_subscription: Option<Subscription>,
    tx: mpsc::WeakUnboundedSender<Command>,
    snapshot_tx: watch::Sender<ScanSnapshot>,
}

impl ScanRuntime {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Dispatch { event, reply } => {
                    self.dispatch(event).await;
                    let _ = reply.send(self.machine.snapshot());
                }
                Command::Internal { scope, event } => {
                    if self.scopes.is_live(scope) {
                        self.dispatch(event).await;
                    } else {
                        debug!(
                            kind = ?scope.kind(),
                            event = event.name(),
                            "dropping event from closed scope"
                        );
                    }
                }
                Command::Shutdown { reply } => {
                    self.teardown();
                    let _ = reply.send(());
                    return;
                }
            }
        }
        self.teardown();
    }

    async fn dispatch(&mut self, event: ScanEvent) {
        let span = info_span!("usecase.scan_orchestrator.dispatch", event = ?event);
        async {
            let from = self.machine.state();
            let event_name = event.name();
            let actions = self.machine.handle(event);
            let to = self.machine.state();
            if from != to {
                info!(from = from.path(), to = to.path(), event = event_name, "scan state transition");
            }

            self.execute_actions(actions).await;
            self.snapshot_tx.send_replace(self.machine.snapshot());
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(&mut self, actions: Vec<ScanAction>) {
        for action in actions {
            debug!(?action, "scan executing action");
            match action {
                // ===== Airplane mode =====
                ScanAction::QueryAirplaneMode => self.query_airplane_mode(),
                ScanAction::CancelAirplaneQuery => {
                    self.scopes.close(TaskKind::AirplaneQuery);
                }
                ScanAction::RequestDisableAirplaneMode => {
                    let airplane = Arc::clone(&self.deps.airplane);
                    tokio::spawn(async move {
                        if let Err(err) = airplane.request_disable_airplane_mode().await {
                            warn!(error = %err, "airplane mode toggle request failed");
                        }
                    });
                }

                // ===== Location =====
                ScanAction::SubscribeLocationStatus => self.subscribe_location_status(),
                ScanAction::UnsubscribeLocationStatus => {
                    self.scopes.close(TaskKind::LocationStatus);
                    if let Some(subscription) = self.location_subscription.take() {
                        subscription.remove();
                    }
                }
                ScanAction::RequestEnableLocation => {
                    let location = Arc::clone(&self.deps.location);
                    let config = Arc::clone(&self.config);
                    tokio::spawn(async move {
                        if let Err(err) = location.request_resolution(&config.location).await {
                            warn!(error = %err, "location resolution request failed");
                        }
                    });
                }
                ScanAction::StartPermissionCheck => self.start_permission_check(),
                ScanAction::CancelPermissionCheck => {
                    self.scopes.close(TaskKind::PermissionCheck);
                }
                ScanAction::OpenSettings => {
                    let settings = Arc::clone(&self.deps.settings);
                    tokio::spawn(async move {
                        if let Err(err) = settings.open_settings().await {
                            warn!(error = %err, "opening system settings failed");
                        }
                    });
                }

                // ===== Connection lifecycle =====
                ScanAction::DestroyConnection => {
                    destroy_connection(self.deps.transport.as_ref()).await;
                }
                ScanAction::StartSettleTimer => {
                    self.spawn_scoped(TaskKind::SettleTimer, |poster| async move {
                        tokio::time::sleep(CONNECTION_SETTLE_DELAY).await;
                        poster.post(ScanEvent::ConnectionCleared);
                    });
                }
                ScanAction::CancelSettleTimer => {
                    self.scopes.close(TaskKind::SettleTimer);
                }
                ScanAction::RemoveDiagnostics => self.diagnostics.retire(),
                ScanAction::RegisterDiagnostics => {
                    self.diagnostics.register(self.deps.transport.as_ref());
                }
                ScanAction::SetConnectionParameters(descriptor) => {
                    if let Err(err) = self
                        .deps
                        .transport
                        .set_connection_parameters(&descriptor)
                        .await
                    {
                        warn!(error = %err, cid = descriptor.connection_id(), "setting connection parameters failed");
                    }
                }
                ScanAction::RequestLocalDeviceInfo => self.request_local_device_info(),
                ScanAction::CancelLocalDeviceInfo => {
                    self.scopes.close(TaskKind::DeviceInfo);
                }
                ScanAction::CreateConnection(role) => self.create_connection(role),
                ScanAction::CancelConnect => {
                    self.scopes.close(TaskKind::Connect);
                }

                // ===== Protocol =====
                ScanAction::StartHandshake(info) => self.start_protocol(
                    ProtocolPhase::Handshake,
                    Envelope::new(MessageType::SenderInfo, info).to_wire(),
                ),
                ScanAction::StartTransfer(credential) => self.start_protocol(
                    ProtocolPhase::Transfer,
                    Envelope::new(MessageType::SendVid, credential).to_wire(),
                ),
                ScanAction::StopProtocol => self.stop_protocol(),

                ScanAction::LogShared { selected, receiver } => self.log_shared(&selected, &receiver),
            }
        }

        self.diagnostics.settle();
    }

    fn poster(&self, scope: ScopeToken) -> ScopedPoster {
        ScopedPoster {
            tx: self.tx.clone(),
            scope,
        }
    }

    /// Opens a scope of `kind` and runs `task` inside it.
    fn spawn_scoped<F, Fut>(&mut self, kind: TaskKind, task: F)
    where
        F: FnOnce(ScopedPoster) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.scopes.open(kind);
        let handle = tokio::spawn(task(self.poster(token)));
        self.scopes.attach(token, handle.abort_handle());
    }

    fn query_airplane_mode(&mut self) {
        let airplane = Arc::clone(&self.deps.airplane);
        self.spawn_scoped(TaskKind::AirplaneQuery, |poster| async move {
            let enabled = match airplane.is_airplane_mode_enabled().await {
                Ok(enabled) => enabled,
                Err(err) => {
                    warn!(error = %err, "airplane mode query failed, assuming disabled");
                    false
                }
            };
            poster.post(if enabled {
                ScanEvent::FlightEnabled
            } else {
                ScanEvent::FlightDisabled
            });
        });
    }

    fn subscribe_location_status(&mut self) {
        let token = self.scopes.open(TaskKind::LocationStatus);
        let poster = self.poster(token);
        let handler: LocationStatusHandler = Arc::new(move |status: LocationStatus| {
            poster.post(if status.location_enabled {
                ScanEvent::LocationEnabled
            } else {
                ScanEvent::LocationDisabled
            });
        });
        let subscription = self.deps.location.subscribe_location_status(handler);
        if let Some(previous) = self.location_subscription.replace(subscription) {
            debug!(label = previous.label(), "replacing live subscription");
            previous.remove();
        }

        let location = Arc::clone(&self.deps.location);
        let config = Arc::clone(&self.config);
        let check = tokio::spawn(async move {
            if let Err(err) = location.check_settings(&config.location).await {
                warn!(error = %err, "location settings check failed");
            }
        });
        self.scopes.attach(token, check.abort_handle());
    }

    fn start_permission_check(&mut self) {
        let permission = Arc::clone(&self.deps.permission);
        let config = Arc::clone(&self.config);
        self.spawn_scoped(TaskKind::PermissionCheck, |poster| async move {
            tokio::time::sleep(PERMISSION_SETTLE_DELAY).await;
            let granted = match permission
                .request_location_permission(&config.permission_prompt)
                .await
            {
                Ok(status) => {
                    debug!(?status, "location permission answered");
                    status.is_granted()
                }
                Err(err) => {
                    warn!(error = %err, "location permission request failed");
                    false
                }
            };
            poster.post(if granted {
                ScanEvent::PermissionGranted
            } else {
                ScanEvent::PermissionDenied
            });
        });
    }

    fn request_local_device_info(&mut self) {
        let device_info = Arc::clone(&self.deps.device_info);
        self.spawn_scoped(TaskKind::DeviceInfo, |poster| async move {
            match device_info.local_device_info().await {
                Ok(info) => poster.post(ScanEvent::LocalDeviceInfoReceived(info)),
                Err(err) => {
                    warn!(error = %err, "local device info unavailable");
                    poster.post(ScanEvent::ConnectionFailed);
                }
            }
        });
    }

    fn create_connection(&mut self, role: ConnectionRole) {
        let transport = Arc::clone(&self.deps.transport);
        self.spawn_scoped(TaskKind::Connect, |poster| async move {
            match transport.create_connection(role).await {
                Ok(()) => poster.post(ScanEvent::Connected),
                Err(err) => {
                    warn!(error = %err, role = role.as_str(), "connection attempt failed");
                    poster.post(ScanEvent::ConnectionFailed);
                }
            }
        });
    }

    /// Listens for the phase's response, then sends `payload`.
    ///
    /// The listener is registered first so a fast reply cannot be missed.
    fn start_protocol(&mut self, phase: ProtocolPhase, payload: Result<String, EnvelopeError>) {
        let token = self.scopes.open(TaskKind::Protocol);
        let poster = self.poster(token);

        let payload = match payload {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, ?phase, "failed to encode outbound envelope");
                poster.post(ScanEvent::ConnectionFailed);
                return;
            }
        };

        let listener = poster.clone();
        let handler: NearbyEventHandler =
            Arc::new(move |event| match decode_inbound(phase, &event) {
                Ok(Some(signal)) => listener.post(signal.into()),
                Ok(None) => {}
                Err(err) => debug!(error = %err, ?phase, "ignoring malformed inbound envelope"),
            });
        let subscription = self.deps.transport.subscribe_nearby_events(handler);
        if let Some(previous) = self.protocol_subscription.replace(subscription) {
            debug!(label = previous.label(), "replacing live subscription");
            previous.remove();
        }

        let transport = Arc::clone(&self.deps.transport);
        let send = tokio::spawn(async move {
            if let Err(err) = transport.send(payload).await {
                warn!(error = %err, ?phase, "protocol send failed");
                poster.post(ScanEvent::ConnectionFailed);
            }
        });
        self.scopes.attach(token, send.abort_handle());
    }

    fn stop_protocol(&mut self) {
        self.scopes.close(TaskKind::Protocol);
        if let Some(subscription) = self.protocol_subscription.take() {
            subscription.remove();
        }
    }

    /// Fire-and-forget: a failed write never affects the transfer.
    fn log_shared(&self, selected: &SelectedCredential, receiver: &DeviceInfo) {
        let entry = ActivityLogEntry::shared(selected, receiver, self.deps.clock.now_ms());
        let activity_log = Arc::clone(&self.deps.activity_log);
        tokio::spawn(async move {
            if let Err(err) = activity_log.append(entry).await {
                warn!(error = %err, "activity log append failed");
            }
        });
    }

    fn teardown(&mut self) {
        self.scopes.close_all();
        if let Some(subscription) = self.location_subscription.take() {
            subscription.remove();
        }
        if let Some(subscription) = self.protocol_subscription.take() {
            subscription.remove();
        }
        self.diagnostics.remove_all();
        debug!("scan runtime stopped");
    }
}

/// Destroys the current connection; a missing connection counts as destroyed.
async fn destroy_connection(transport: &dyn TransportPort) {
    match transport.destroy_connection().await {
        Ok(()) => debug!("connection destroyed"),
        Err(err) => debug!(error = %err, "destroy connection failed, ignoring"),
    }
}
