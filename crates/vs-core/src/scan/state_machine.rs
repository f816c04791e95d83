#[cfg(feature = "tracing")]
use tracing::debug;

use super::action::ScanAction;
use super::context::ScanContext;
use super::event::ScanEvent;
use super::selectors::ScanSnapshot;
use super::state::{FlightState, LocationState, ReviewState, ScanState};
use crate::connection::{validate_token, ConnectionRole};
use crate::credential::SelectedCredential;
use crate::protocol::TransferOutcome;

/// Outcome of matching an event against the current state.
enum Step {
    Ignore,
    /// Stay put and run only these actions.
    Stay(Vec<ScanAction>),
    /// Move to `target`. Between two children of the same parent only the
    /// children are exited and entered, unless `restart` forces the parent
    /// to be left and re-entered.
    Go {
        target: ScanState,
        actions: Vec<ScanAction>,
        restart: bool,
    },
}

fn go(target: ScanState) -> Step {
    go_with(target, Vec::new())
}

fn go_with(target: ScanState, actions: Vec<ScanAction>) -> Step {
    Step::Go {
        target,
        actions,
        restart: false,
    }
}

fn restart(target: ScanState) -> Step {
    Step::Go {
        target,
        actions: Vec::new(),
        restart: true,
    }
}

/// Pure scan state machine: no side-effects, only actions.
///
/// 纯状态机：不包含副作用。
#[derive(Debug, Clone, Default)]
pub struct ScanStateMachine {
    state: ScanState,
    context: ScanContext,
}

impl ScanStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn context(&self) -> &ScanContext {
        &self.context
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot::new(self.state, self.context.clone())
    }

    /// Processes one event to completion and returns the actions to run.
    ///
    /// Events that do not apply to the current state are no-ops.
    pub fn handle(&mut self, event: ScanEvent) -> Vec<ScanAction> {
        #[cfg(feature = "tracing")]
        let name = event.name();

        match self.step(event) {
            Step::Ignore => {
                #[cfg(feature = "tracing")]
                debug!(state = self.state.path(), event = name, "scan event ignored");
                Vec::new()
            }
            Step::Stay(actions) => actions,
            Step::Go {
                target,
                actions,
                restart,
            } => self.transition_to(target, actions, restart),
        }
    }

    fn step(&mut self, event: ScanEvent) -> Step {
        use FlightState as F;
        use LocationState as L;
        use ReviewState as R;
        use ScanEvent as E;
        use ScanState as S;

        // Screen visibility gates the whole machine, from any state.
        match event {
            E::ScreenBlur => return restart(S::Inactive),
            E::ScreenFocus => return restart(S::CheckingAirplaneMode(F::CheckingStatus)),
            _ => {}
        }

        match (self.state, event) {
            // ===== Airplane mode =====
            (S::CheckingAirplaneMode(F::CheckingStatus), E::FlightDisabled) => {
                go(S::CheckingLocationService(L::CheckingStatus))
            }
            (S::CheckingAirplaneMode(F::CheckingStatus), E::FlightEnabled) => {
                go(S::CheckingAirplaneMode(F::Enabled))
            }
            (S::CheckingAirplaneMode(F::Enabled), E::FlightRequest) => {
                go(S::CheckingAirplaneMode(F::RequestingToDisable))
            }
            (S::CheckingAirplaneMode(F::RequestingToDisable), E::FlightDisabled) => {
                go(S::CheckingAirplaneMode(F::CheckingStatus))
            }
            // The toggle request reports nothing; re-query when the user comes back.
            (S::CheckingAirplaneMode(F::Enabled | F::RequestingToDisable), E::AppActive) => {
                go(S::CheckingAirplaneMode(F::CheckingStatus))
            }

            // ===== Location service =====
            (S::CheckingLocationService(L::CheckingStatus), E::LocationEnabled) => {
                go(S::CheckingLocationService(L::CheckingPermission))
            }
            (S::CheckingLocationService(L::CheckingStatus), E::LocationDisabled) => {
                go(S::CheckingLocationService(L::RequestingToEnable))
            }
            (S::CheckingLocationService(L::RequestingToEnable), E::LocationEnabled) => {
                go(S::CheckingLocationService(L::CheckingPermission))
            }
            (S::CheckingLocationService(L::RequestingToEnable), E::LocationDisabled) => {
                go(S::CheckingLocationService(L::Disabled))
            }
            (S::CheckingLocationService(L::CheckingPermission), E::PermissionGranted) => {
                go(S::ClearingConnection)
            }
            (S::CheckingLocationService(L::CheckingPermission), E::PermissionDenied) => {
                go(S::CheckingLocationService(L::Denied))
            }
            (S::CheckingLocationService(L::CheckingPermission), E::LocationDisabled) => {
                go(S::CheckingLocationService(L::RequestingToEnable))
            }
            (S::CheckingLocationService(L::Denied), E::LocationRequest) => {
                Step::Stay(vec![ScanAction::OpenSettings])
            }
            (S::CheckingLocationService(L::Denied), E::AppActive) => {
                go(S::CheckingLocationService(L::CheckingPermission))
            }
            (S::CheckingLocationService(L::Disabled), E::LocationRequest) => {
                go(S::CheckingLocationService(L::RequestingToEnable))
            }
            (S::CheckingLocationService(L::Disabled), E::LocationEnabled) => {
                go(S::CheckingLocationService(L::CheckingPermission))
            }

            // ===== Connection lifecycle =====
            (S::ClearingConnection, E::ConnectionCleared) => go(S::FindingConnection),
            (S::FindingConnection, E::Scan(token)) => match validate_token(&token) {
                Ok(descriptor) => {
                    self.context.descriptor = Some(descriptor.clone());
                    go_with(
                        S::PreparingToConnect,
                        vec![ScanAction::SetConnectionParameters(descriptor)],
                    )
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    debug!(error = %_err, "scanned token rejected");
                    go(S::Invalid)
                }
            },
            (S::PreparingToConnect, E::LocalDeviceInfoReceived(info)) => {
                self.context.sender_info = Some(info);
                go(S::Connecting)
            }
            (S::PreparingToConnect | S::Connecting, E::ConnectionFailed) => go(S::Disconnected),
            (S::Connecting, E::Connected) => go(S::ExchangingDeviceInfo),

            // ===== Handshake =====
            (S::ExchangingDeviceInfo, E::PeerInfoReceived(info)) => {
                self.context.receiver_info = Some(info);
                go(S::Reviewing(R::Idle))
            }
            (S::ExchangingDeviceInfo, E::PeerDisconnected | E::ConnectionFailed) => {
                go(S::Disconnected)
            }

            // ===== Review and transfer =====
            // The share is over once the host is sent home.
            (S::Reviewing(R::NavigatingToHome), E::UpdateReason(_)) => Step::Ignore,
            (S::Reviewing(_), E::UpdateReason(reason)) => {
                self.context.reason = reason;
                Step::Stay(Vec::new())
            }
            (S::Reviewing(R::Idle), E::AcceptRequest) => go(S::Reviewing(R::SelectingCredential)),
            (S::Reviewing(R::SelectingCredential), E::SelectCredential(credential)) => {
                self.context.selected = Some(SelectedCredential::new(
                    credential,
                    self.context.reason.clone(),
                ));
                go(S::Reviewing(R::SendingCredential))
            }
            (S::Reviewing(R::SelectingCredential), E::Cancel | E::Dismiss) => {
                go(S::Reviewing(R::Idle))
            }
            (S::Reviewing(R::SendingCredential), E::TransferCompleted(outcome)) => match outcome {
                TransferOutcome::Accepted => go(S::Reviewing(R::Accepted)),
                TransferOutcome::Rejected => go(S::Reviewing(R::Rejected)),
            },
            (S::Reviewing(R::SendingCredential), E::PeerDisconnected | E::ConnectionFailed) => {
                go(S::Disconnected)
            }
            (S::Reviewing(R::Accepted), E::Dismiss) => go(S::Reviewing(R::NavigatingToHome)),
            // Leaving review abandons the connection, it does not reset the picker.
            (S::Reviewing(_), E::Cancel | E::Dismiss) => go(S::FindingConnection),

            // ===== Interrupt states =====
            (S::Disconnected | S::Invalid, E::Dismiss) => go(S::FindingConnection),

            _ => Step::Ignore,
        }
    }

    fn transition_to(
        &mut self,
        target: ScanState,
        actions: Vec<ScanAction>,
        restart: bool,
    ) -> Vec<ScanAction> {
        let from = self.state;
        let mut out = child_exit(from);

        let local = !restart && from.same_parent(&target) && is_compound(from);
        if !local {
            out.extend(self.parent_exit(from));
        }
        out.extend(actions);

        self.state = target;
        if !local {
            out.extend(self.parent_entry(target));
        }
        out.extend(self.child_entry(target));

        #[cfg(feature = "tracing")]
        debug!(from = from.path(), to = target.path(), actions = out.len(), "scan transition");

        out
    }

    fn parent_exit(&mut self, state: ScanState) -> Vec<ScanAction> {
        match state {
            ScanState::CheckingLocationService(_) => vec![ScanAction::UnsubscribeLocationStatus],
            ScanState::ClearingConnection => vec![ScanAction::CancelSettleTimer],
            ScanState::PreparingToConnect => vec![ScanAction::CancelLocalDeviceInfo],
            ScanState::Connecting => vec![ScanAction::CancelConnect],
            ScanState::ExchangingDeviceInfo => vec![ScanAction::StopProtocol],
            ScanState::Reviewing(_) => {
                self.context.clear_review();
                vec![ScanAction::DestroyConnection]
            }
            ScanState::Inactive
            | ScanState::CheckingAirplaneMode(_)
            | ScanState::FindingConnection
            | ScanState::Disconnected
            | ScanState::Invalid => Vec::new(),
        }
    }

    fn parent_entry(&self, state: ScanState) -> Vec<ScanAction> {
        match state {
            ScanState::Inactive => vec![ScanAction::RemoveDiagnostics],
            ScanState::CheckingLocationService(_) => vec![ScanAction::SubscribeLocationStatus],
            ScanState::ClearingConnection => vec![
                ScanAction::DestroyConnection,
                ScanAction::StartSettleTimer,
            ],
            ScanState::FindingConnection => vec![
                ScanAction::RemoveDiagnostics,
                ScanAction::RegisterDiagnostics,
            ],
            ScanState::PreparingToConnect => vec![ScanAction::RequestLocalDeviceInfo],
            ScanState::Connecting => vec![ScanAction::CreateConnection(ConnectionRole::Discoverer)],
            ScanState::ExchangingDeviceInfo => vec![ScanAction::StartHandshake(
                self.context.sender_info.clone().unwrap_or_default(),
            )],
            // A new attempt must never start on top of a half-open connection.
            ScanState::Disconnected => vec![ScanAction::DestroyConnection],
            ScanState::CheckingAirplaneMode(_) | ScanState::Reviewing(_) | ScanState::Invalid => {
                Vec::new()
            }
        }
    }

    fn child_entry(&mut self, state: ScanState) -> Vec<ScanAction> {
        match state {
            ScanState::CheckingAirplaneMode(FlightState::CheckingStatus) => {
                vec![ScanAction::QueryAirplaneMode]
            }
            ScanState::CheckingAirplaneMode(FlightState::RequestingToDisable) => {
                vec![ScanAction::RequestDisableAirplaneMode]
            }
            ScanState::CheckingLocationService(LocationState::RequestingToEnable) => {
                vec![ScanAction::RequestEnableLocation]
            }
            ScanState::CheckingLocationService(LocationState::CheckingPermission) => {
                vec![ScanAction::StartPermissionCheck]
            }
            ScanState::Reviewing(ReviewState::SendingCredential) => self
                .context
                .selected
                .as_ref()
                .map(|selected| vec![ScanAction::StartTransfer(selected.to_transfer_record())])
                .unwrap_or_default(),
            ScanState::Reviewing(ReviewState::Accepted) => {
                match (&self.context.selected, &self.context.receiver_info) {
                    (Some(selected), Some(receiver)) => vec![ScanAction::LogShared {
                        selected: selected.clone(),
                        receiver: receiver.clone(),
                    }],
                    _ => Vec::new(),
                }
            }
            // A completed share keeps neither the transport nor the reason.
            ScanState::Reviewing(ReviewState::NavigatingToHome) => {
                self.context.clear_review();
                vec![ScanAction::DestroyConnection]
            }
            _ => Vec::new(),
        }
    }
}

fn is_compound(state: ScanState) -> bool {
    matches!(
        state,
        ScanState::CheckingAirplaneMode(_)
            | ScanState::CheckingLocationService(_)
            | ScanState::Reviewing(_)
    )
}

fn child_exit(state: ScanState) -> Vec<ScanAction> {
    match state {
        ScanState::CheckingAirplaneMode(FlightState::CheckingStatus) => {
            vec![ScanAction::CancelAirplaneQuery]
        }
        ScanState::CheckingLocationService(LocationState::CheckingPermission) => {
            vec![ScanAction::CancelPermissionCheck]
        }
        ScanState::Reviewing(ReviewState::SendingCredential) => vec![ScanAction::StopProtocol],
        _ => Vec::new(),
    }
}
