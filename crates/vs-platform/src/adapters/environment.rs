//! Controllable OS environment
//! 可控的系统环境
//!
//! Airplane mode, the location service and the location permission as plain
//! switches. Requests made by the orchestrator flip the switches the way a
//! cooperative user would, unless told otherwise.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;
use vs_core::environment::LocationStatus;
use vs_core::ports::{
    AirplaneModePort, LocationPermissionPort, LocationServicePort, LocationStatusHandler,
    Subscription, SystemSettingsPort,
};
use vs_core::{EnvironmentConfig, PermissionRationale, PermissionStatus};

use crate::sync::lock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentStats {
    pub airplane_queries: usize,
    pub airplane_disable_requests: usize,
    pub settings_checks: usize,
    pub resolution_requests: usize,
    pub permission_requests: usize,
    pub settings_opened: usize,
    pub live_location_listeners: usize,
}

struct Inner {
    airplane_enabled: bool,
    location_enabled: bool,
    permission: PermissionStatus,
    /// Answers to resolution requests; an empty queue means the user agrees.
    resolution_answers: VecDeque<bool>,
    /// Permission the user grants from the settings screen, if any.
    permission_from_settings: Option<PermissionStatus>,
    next_id: u64,
    listeners: HashMap<u64, LocationStatusHandler>,
    stats: EnvironmentStats,
}

#[derive(Clone)]
pub struct ControllableEnvironment {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ControllableEnvironment {
    /// Airplane mode off, location on, permission granted.
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                airplane_enabled: false,
                location_enabled: true,
                permission: PermissionStatus::Granted,
                resolution_answers: VecDeque::new(),
                permission_from_settings: None,
                next_id: 0,
                listeners: HashMap::new(),
                stats: EnvironmentStats::default(),
            })),
        }
    }
}

impl ControllableEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> EnvironmentStats {
        lock(&self.inner).stats
    }

    pub fn set_airplane_enabled(&self, enabled: bool) {
        lock(&self.inner).airplane_enabled = enabled;
    }

    pub fn set_permission(&self, status: PermissionStatus) {
        lock(&self.inner).permission = status;
    }

    /// Permission the user will grant after [`SystemSettingsPort::open_settings`].
    pub fn grant_from_settings(&self, status: PermissionStatus) {
        lock(&self.inner).permission_from_settings = Some(status);
    }

    /// Queue the user's answer to the next resolution dialog.
    pub fn answer_next_resolution(&self, enable: bool) {
        lock(&self.inner).resolution_answers.push_back(enable);
    }

    /// Changes the location service and notifies live listeners.
    pub fn set_location_enabled(&self, enabled: bool) {
        lock(&self.inner).location_enabled = enabled;
        self.publish_location();
    }

    fn publish_location(&self) {
        let (status, handlers) = {
            let inner = lock(&self.inner);
            let status = LocationStatus {
                location_enabled: inner.location_enabled,
            };
            let handlers: Vec<LocationStatusHandler> = inner.listeners.values().cloned().collect();
            (status, handlers)
        };
        for handler in handlers {
            handler(status);
        }
    }
}

#[async_trait]
impl AirplaneModePort for ControllableEnvironment {
    async fn is_airplane_mode_enabled(&self) -> anyhow::Result<bool> {
        let mut inner = lock(&self.inner);
        inner.stats.airplane_queries += 1;
        Ok(inner.airplane_enabled)
    }

    async fn request_disable_airplane_mode(&self) -> anyhow::Result<()> {
        let mut inner = lock(&self.inner);
        inner.stats.airplane_disable_requests += 1;
        inner.airplane_enabled = false;
        Ok(())
    }
}

#[async_trait]
impl LocationServicePort for ControllableEnvironment {
    fn subscribe_location_status(&self, handler: LocationStatusHandler) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, handler);
            inner.stats.live_location_listeners = inner.listeners.len();
            id
        };
        let inner = Arc::clone(&self.inner);
        Subscription::new("location-status", move || {
            let mut inner = lock(&inner);
            inner.listeners.remove(&id);
            inner.stats.live_location_listeners = inner.listeners.len();
        })
    }

    async fn check_settings(&self, config: &EnvironmentConfig) -> anyhow::Result<()> {
        debug!(priority = ?config.priority, "checking location settings");
        lock(&self.inner).stats.settings_checks += 1;
        self.publish_location();
        Ok(())
    }

    async fn request_resolution(&self, config: &EnvironmentConfig) -> anyhow::Result<()> {
        debug!(always_show = config.always_show, "showing location resolution dialog");
        {
            let mut inner = lock(&self.inner);
            inner.stats.resolution_requests += 1;
            let enable = inner.resolution_answers.pop_front().unwrap_or(true);
            inner.location_enabled = inner.location_enabled || enable;
        }
        self.publish_location();
        Ok(())
    }
}

#[async_trait]
impl LocationPermissionPort for ControllableEnvironment {
    async fn request_location_permission(
        &self,
        rationale: &PermissionRationale,
    ) -> anyhow::Result<PermissionStatus> {
        debug!(title = %rationale.title, "requesting location permission");
        let mut inner = lock(&self.inner);
        inner.stats.permission_requests += 1;
        Ok(inner.permission)
    }
}

#[async_trait]
impl SystemSettingsPort for ControllableEnvironment {
    async fn open_settings(&self) -> anyhow::Result<()> {
        let mut inner = lock(&self.inner);
        inner.stats.settings_opened += 1;
        if let Some(status) = inner.permission_from_settings.take() {
            inner.permission = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(env: &ControllableEnvironment) -> (Arc<Mutex<Vec<bool>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = env.subscribe_location_status(Arc::new(move |status| {
            sink.lock().unwrap().push(status.location_enabled);
        }));
        (seen, subscription)
    }

    #[tokio::test]
    async fn declined_resolution_keeps_location_off() {
        let env = ControllableEnvironment::new();
        let (seen, _subscription) = recording(&env);
        env.set_location_enabled(false);
        env.answer_next_resolution(false);

        env.request_resolution(&EnvironmentConfig::default()).await.unwrap();
        env.request_resolution(&EnvironmentConfig::default()).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![false, false, true]);
        assert_eq!(env.stats().resolution_requests, 2);
    }

    #[tokio::test]
    async fn settings_can_grant_permission() {
        let env = ControllableEnvironment::new();
        env.set_permission(PermissionStatus::Denied);
        env.grant_from_settings(PermissionStatus::Granted);
        let rationale = PermissionRationale::default();

        assert_eq!(
            env.request_location_permission(&rationale).await.unwrap(),
            PermissionStatus::Denied
        );
        env.open_settings().await.unwrap();
        assert_eq!(
            env.request_location_permission(&rationale).await.unwrap(),
            PermissionStatus::Granted
        );
    }

    #[test]
    fn removing_subscription_stops_notifications() {
        let env = ControllableEnvironment::new();
        let (seen, subscription) = recording(&env);
        assert_eq!(env.stats().live_location_listeners, 1);

        subscription.remove();
        env.set_location_enabled(false);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(env.stats().live_location_listeners, 0);
    }
}
