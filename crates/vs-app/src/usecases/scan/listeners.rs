//! Diagnostic listener set: one nearby-event logger and one transport-log
//! logger, tagged with the local device label.
//!
//! Swapping the set is gated by a generation counter. The retiring pair stays
//! attached until its replacement is registered and the gate has moved, so an
//! event is logged by exactly one pair and never by a removed one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;
use vs_core::ports::{Subscription, TransportPort};

const CLOSED: u64 = 0;

struct DiagnosticPair {
    nearby: Subscription,
    log: Subscription,
}

impl DiagnosticPair {
    fn remove(self) {
        self.nearby.remove();
        self.log.remove();
    }
}

pub struct DiagnosticListeners {
    device_label: Arc<str>,
    gate: Arc<AtomicU64>,
    next_generation: u64,
    live: Option<DiagnosticPair>,
    retiring: Option<DiagnosticPair>,
}

impl DiagnosticListeners {
    pub fn new(device_label: impl Into<Arc<str>>) -> Self {
        Self {
            device_label: device_label.into(),
            gate: Arc::new(AtomicU64::new(CLOSED)),
            next_generation: CLOSED,
            live: None,
            retiring: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.live.is_some()
    }

    /// Marks the live pair for removal. It is removed by the next
    /// [`register`](Self::register) or [`settle`](Self::settle).
    pub fn retire(&mut self) {
        if let Some(pair) = self.live.take() {
            if let Some(older) = self.retiring.replace(pair) {
                older.remove();
            }
        }
    }

    pub fn register(&mut self, transport: &dyn TransportPort) {
        self.retire();
        self.next_generation += 1;
        let generation = self.next_generation;

        let label = Arc::clone(&self.device_label);
        let gate = Arc::clone(&self.gate);
        let nearby = transport.subscribe_nearby_events(Arc::new(move |event| {
            if gate.load(Ordering::Acquire) == generation {
                debug!(device = %label, channel = "<Sender.Event>", event = ?event, "nearby event");
            }
        }));

        let label = Arc::clone(&self.device_label);
        let gate = Arc::clone(&self.gate);
        let log = transport.subscribe_log_events(Arc::new(move |line| {
            if gate.load(Ordering::Acquire) == generation {
                debug!(device = %label, channel = "<Sender.Log>", line = %line, "transport log");
            }
        }));

        self.gate.store(generation, Ordering::Release);
        self.live = Some(DiagnosticPair { nearby, log });
        self.settle();
    }

    /// Removes a retired pair that was not replaced.
    pub fn settle(&mut self) {
        if let Some(pair) = self.retiring.take() {
            if self.live.is_none() {
                self.gate.store(CLOSED, Ordering::Release);
            }
            pair.remove();
        }
    }

    /// Removes every listener immediately.
    pub fn remove_all(&mut self) {
        self.retire();
        self.settle();
    }
}
