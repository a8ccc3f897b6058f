//! Synchronization controller
//!
//! Reconciles backend events and user commands into one [`SessionStore`].
//! Every backend failure is caught and logged here; nothing crosses into
//! the view layer except the documented `bool` results.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, info, warn};

use crate::domain::config::BackendConfig;
use crate::domain::device::AudioDevice;
use crate::domain::session::{transition, BackendEvent, ALL_EVENTS};
use crate::domain::shortcut::Shortcut;

use super::ports::{invoke_typed, BackendCommand, CommandGateway, EventRegistry};
use super::store::{SessionSnapshot, SessionStore};
use super::subscriptions::SubscriptionSet;

/// Errors from the controller lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Session is already active")]
    AlreadyActive,

    #[error("Session was torn down")]
    TornDown,
}

/// Lifecycle of one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Inactive,
    Active,
    TornDown,
}

/// Orchestrates one session against the backend.
///
/// Lifecycle: INACTIVE -> ACTIVE (activate) -> TORN_DOWN (teardown).
/// Events are queued by the subscriptions and applied by
/// [`process_pending`](Self::process_pending) or [`run`](Self::run), in the
/// order they were delivered.
pub struct SyncController<G, R>
where
    G: CommandGateway,
    R: EventRegistry,
{
    gateway: G,
    registry: R,
    store: SessionStore,
    lifecycle: Mutex<Lifecycle>,
    subscriptions: Mutex<SubscriptionSet>,
    inbox: Mutex<Option<mpsc::UnboundedReceiver<BackendEvent>>>,
    shutdown: Notify,
}

impl<G, R> SyncController<G, R>
where
    G: CommandGateway,
    R: EventRegistry,
{
    /// Create an inactive controller
    pub fn new(gateway: G, registry: R) -> Self {
        Self {
            gateway,
            registry,
            store: SessionStore::new(),
            lifecycle: Mutex::new(Lifecycle::Inactive),
            subscriptions: Mutex::new(SubscriptionSet::new()),
            inbox: Mutex::new(None),
            shutdown: Notify::new(),
        }
    }

    /// Read access to the session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Copy of the current session snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot()
    }

    /// Current lifecycle stage
    pub fn lifecycle(&self) -> Lifecycle {
        *lock(&self.lifecycle)
    }

    /// Number of live event subscriptions
    pub fn subscription_count(&self) -> usize {
        lock(&self.subscriptions).len()
    }

    /// Activate the session: load config, enumerate devices, subscribe.
    ///
    /// Runs once per controller. A second call fails without subscribing
    /// again, as does activating a torn-down controller.
    pub async fn activate(&self) -> Result<(), SyncError> {
        {
            let mut lifecycle = lock(&self.lifecycle);
            match *lifecycle {
                Lifecycle::Inactive => *lifecycle = Lifecycle::Active,
                Lifecycle::Active => return Err(SyncError::AlreadyActive),
                Lifecycle::TornDown => return Err(SyncError::TornDown),
            }
        }

        self.load_config().await;
        self.load_devices().await;

        // Held while subscribing so teardown cannot interleave.
        let lifecycle = lock(&self.lifecycle);
        if *lifecycle == Lifecycle::TornDown {
            return Err(SyncError::TornDown);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscriptions = lock(&self.subscriptions);
        for name in ALL_EVENTS {
            let tx = tx.clone();
            let disposer = self.registry.subscribe(
                *name,
                Arc::new(move |event: &BackendEvent| {
                    let _ = tx.send(event.clone());
                }),
            );
            subscriptions.push(disposer);
        }
        *lock(&self.inbox) = Some(rx);

        info!(subscriptions = subscriptions.len(), "session activated");
        drop(subscriptions);
        drop(lifecycle);
        Ok(())
    }

    /// Apply every event queued so far.
    ///
    /// # Returns
    /// The number of events applied
    pub async fn process_pending(&self) -> usize {
        let Some(mut rx) = self.take_inbox() else {
            return 0;
        };

        let mut applied = 0;
        while let Ok(event) = rx.try_recv() {
            if !self.is_active() {
                break;
            }
            self.apply_event(event).await;
            applied += 1;
        }

        if self.is_active() {
            *lock(&self.inbox) = Some(rx);
        }
        applied
    }

    /// Apply events as they arrive until the session is torn down.
    pub async fn run(&self) {
        let Some(mut rx) = self.take_inbox() else {
            warn!("event loop started without an active session");
            return;
        };

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) if self.is_active() => self.apply_event(event).await,
                    _ => break,
                },
                _ = self.shutdown.notified() => break,
            }
        }
        debug!("event loop finished");
    }

    /// Release every subscription. Idempotent; safe before activation.
    pub fn teardown(&self) {
        let mut lifecycle = lock(&self.lifecycle);
        if *lifecycle == Lifecycle::TornDown {
            return;
        }
        *lifecycle = Lifecycle::TornDown;

        let released = lock(&self.subscriptions).dispose_all();
        // Queued but unapplied events are dropped with the receiver.
        lock(&self.inbox).take();
        self.shutdown.notify_one();
        info!(subscriptions = released, "session torn down");
    }

    /// Ask the backend to start or stop recording.
    ///
    /// State does not change here; the backend answers with events.
    pub async fn toggle_recording(&self) {
        let result = self
            .gateway
            .invoke(BackendCommand::ToggleRecording, Value::Null)
            .await;
        if let Err(e) = result {
            warn!(error = %e, "toggle recording failed");
        }
    }

    /// Configuration load procedure.
    ///
    /// Replaces the cached config, then pushes its audio device to the
    /// backend. Failures keep the previous copy.
    pub async fn load_config(&self) {
        let config: BackendConfig =
            match invoke_typed(&self.gateway, BackendCommand::LoadConfig, Value::Null).await {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, "failed to load config, keeping cached copy");
                    return;
                }
            };

        if self.is_torn_down() {
            return;
        }
        let device = config.audio_device.clone();
        self.store.set_config(config);
        debug!("config loaded");

        if device.is_some() {
            self.sync_audio_device(device).await;
        }
    }

    /// Device enumeration procedure
    pub async fn load_devices(&self) {
        let devices: Vec<AudioDevice> =
            match invoke_typed(&self.gateway, BackendCommand::GetAudioDevices, Value::Null).await {
                Ok(devices) => devices,
                Err(e) => {
                    warn!(error = %e, "failed to enumerate audio devices, keeping previous list");
                    return;
                }
            };

        if self.is_torn_down() {
            return;
        }
        debug!(count = devices.len(), "audio devices loaded");
        self.store.set_devices(devices);
    }

    /// Save procedure.
    ///
    /// # Returns
    /// `true` if the backend persisted the candidate
    pub async fn save_config(&self, candidate: BackendConfig) -> bool {
        let candidate = candidate.normalized();

        let saved = self
            .gateway
            .invoke(BackendCommand::SaveConfig, json!({ "config": candidate }))
            .await;
        if let Err(e) = saved {
            warn!(error = %e, "failed to save config");
            return false;
        }

        self.sync_audio_device(candidate.audio_device.clone()).await;

        if !self.is_torn_down() {
            self.store.set_config(candidate);
        }
        if let Err(e) = self.registry.emit(BackendEvent::ConfigUpdated).await {
            warn!(error = %e, "failed to broadcast config update");
        }
        info!("config saved");
        true
    }

    /// Validate a shortcut locally, then ask the backend to register it.
    ///
    /// # Returns
    /// `true` if the backend accepted the shortcut
    pub async fn update_shortcut(&self, shortcut: &str) -> bool {
        let shortcut: Shortcut = match shortcut.parse() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "rejected shortcut");
                return false;
            }
        };

        let result = self
            .gateway
            .invoke(
                BackendCommand::UpdateShortcut,
                json!({ "newShortcut": shortcut.to_string() }),
            )
            .await;
        match result {
            Ok(_) => {
                info!(shortcut = %shortcut, "shortcut updated");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to update shortcut");
                false
            }
        }
    }

    /// Shortcut the backend currently has registered
    pub async fn current_shortcut(&self) -> Option<String> {
        match invoke_typed(&self.gateway, BackendCommand::GetCurrentShortcut, Value::Null).await {
            Ok(shortcut) => Some(shortcut),
            Err(e) => {
                warn!(error = %e, "failed to read current shortcut");
                None
            }
        }
    }

    /// Hide the settings window (used when its close is intercepted)
    pub async fn hide_settings(&self) {
        let result = self
            .gateway
            .invoke(BackendCommand::HideSettings, Value::Null)
            .await;
        if let Err(e) = result {
            warn!(error = %e, "failed to hide settings window");
        }
    }

    /// Best effort: failure is logged and never rolls anything back.
    async fn sync_audio_device(&self, device: Option<String>) {
        let result = self
            .gateway
            .invoke(BackendCommand::SetAudioDevice, json!({ "deviceName": device }))
            .await;
        if let Err(e) = result {
            warn!(error = %e, "failed to apply audio device");
        }
    }

    async fn apply_event(&self, event: BackendEvent) {
        let current = self.store.state();
        let next = transition(current, &event);
        debug!(event = %event.name(), from = %current, to = %next.state, "applying backend event");

        if self.store.apply(&next) {
            self.load_config().await;
        }
    }

    fn take_inbox(&self) -> Option<mpsc::UnboundedReceiver<BackendEvent>> {
        lock(&self.inbox).take()
    }

    fn is_active(&self) -> bool {
        self.lifecycle() == Lifecycle::Active
    }

    fn is_torn_down(&self) -> bool {
        self.lifecycle() == Lifecycle::TornDown
    }
}

impl<G, R> Drop for SyncController<G, R>
where
    G: CommandGateway,
    R: EventRegistry,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{Disposer, EventHandler};
    use crate::domain::error::CommandFailure;
    use crate::domain::session::{AppState, EventName};
    use async_trait::async_trait;

    struct MockGateway {
        calls: Mutex<Vec<(BackendCommand, Value)>>,
        fail: Vec<BackendCommand>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self::failing(Vec::new())
        }

        fn failing(fail: Vec<BackendCommand>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn calls(&self) -> Vec<(BackendCommand, Value)> {
            lock(&self.calls).clone()
        }
    }

    #[async_trait]
    impl CommandGateway for MockGateway {
        async fn invoke(&self, command: BackendCommand, args: Value) -> Result<Value, CommandFailure> {
            lock(&self.calls).push((command, args));
            if self.fail.contains(&command) {
                return Err(CommandFailure::new(command.as_str(), "mock failure"));
            }
            Ok(match command {
                BackendCommand::LoadConfig => json!({ "api_key": "k", "audio_device": "Mic" }),
                BackendCommand::GetAudioDevices => json!([{ "name": "Mic", "is_default": true }]),
                BackendCommand::GetCurrentShortcut => json!("Ctrl+Shift+V"),
                _ => Value::Null,
            })
        }
    }

    #[derive(Default)]
    struct MockRegistry {
        handlers: Arc<Mutex<Vec<(EventName, EventHandler)>>>,
    }

    impl MockRegistry {
        fn deliver(&self, event: BackendEvent) {
            let handlers: Vec<EventHandler> = lock(&self.handlers)
                .iter()
                .filter(|(name, _)| *name == event.name())
                .map(|(_, h)| Arc::clone(h))
                .collect();
            for handler in handlers {
                handler(&event);
            }
        }
    }

    #[async_trait]
    impl EventRegistry for MockRegistry {
        fn subscribe(&self, event: EventName, handler: EventHandler) -> Disposer {
            let handlers = Arc::clone(&self.handlers);
            let marker = Arc::clone(&handler);
            lock(&handlers).push((event, handler));
            Disposer::new(move || {
                lock(&handlers).retain(|(_, h)| !Arc::ptr_eq(h, &marker));
            })
        }

        async fn emit(&self, event: BackendEvent) -> Result<(), CommandFailure> {
            self.deliver(event);
            Ok(())
        }
    }

    #[tokio::test]
    async fn activate_loads_and_subscribes() {
        let controller = SyncController::new(MockGateway::new(), MockRegistry::default());
        controller.activate().await.unwrap();

        assert_eq!(controller.lifecycle(), Lifecycle::Active);
        assert_eq!(controller.subscription_count(), ALL_EVENTS.len());
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.config.unwrap().audio_device, Some("Mic".into()));
        assert_eq!(snapshot.devices.len(), 1);

        let commands: Vec<_> = controller.gateway.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            commands,
            vec![
                BackendCommand::LoadConfig,
                BackendCommand::SetAudioDevice,
                BackendCommand::GetAudioDevices,
            ]
        );
    }

    #[tokio::test]
    async fn second_activation_is_rejected() {
        let controller = SyncController::new(MockGateway::new(), MockRegistry::default());
        controller.activate().await.unwrap();
        assert_eq!(controller.activate().await, Err(SyncError::AlreadyActive));
        assert_eq!(controller.subscription_count(), ALL_EVENTS.len());
    }

    #[tokio::test]
    async fn events_drive_state() {
        let controller = SyncController::new(MockGateway::new(), MockRegistry::default());
        controller.activate().await.unwrap();

        controller.registry.deliver(BackendEvent::RecordingStarted);
        controller.registry.deliver(BackendEvent::RecordingStopped);
        assert_eq!(controller.process_pending().await, 2);
        assert_eq!(controller.snapshot().state, AppState::Processing);
    }

    #[tokio::test]
    async fn toggle_failure_is_swallowed() {
        let gateway = MockGateway::failing(vec![BackendCommand::ToggleRecording]);
        let controller = SyncController::new(gateway, MockRegistry::default());
        controller.toggle_recording().await;
        assert_eq!(controller.snapshot().state, AppState::Idle);
    }

    #[tokio::test]
    async fn teardown_before_activation_is_noop() {
        let controller = SyncController::new(MockGateway::new(), MockRegistry::default());
        controller.teardown();
        controller.teardown();
        assert_eq!(controller.lifecycle(), Lifecycle::TornDown);
        assert_eq!(controller.activate().await, Err(SyncError::TornDown));
    }

    #[tokio::test]
    async fn invalid_shortcut_is_not_sent() {
        let controller = SyncController::new(MockGateway::new(), MockRegistry::default());
        assert!(!controller.update_shortcut("Ctrl+Hyper").await);
        assert!(controller.gateway.calls().is_empty());

        assert!(controller.update_shortcut("ctrl+alt+r").await);
        let (command, args) = controller.gateway.calls().remove(0);
        assert_eq!(command, BackendCommand::UpdateShortcut);
        assert_eq!(args, json!({ "newShortcut": "Ctrl+Alt+R" }));
    }

    #[tokio::test]
    async fn current_shortcut_reads_backend() {
        let controller = SyncController::new(MockGateway::new(), MockRegistry::default());
        assert_eq!(controller.current_shortcut().await, Some("Ctrl+Shift+V".into()));
    }
}
