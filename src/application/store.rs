//! Session state store
//!
//! Holds the snapshot the view layer renders. Every setter replaces whole
//! fields inside one `send_modify`, so observers never see a half-applied
//! update. Mutation is crate-private: views only read and watch.

use tokio::sync::watch;

use crate::domain::config::BackendConfig;
use crate::domain::device::AudioDevice;
use crate::domain::session::{AppState, Effect, Transition};

/// Everything the view layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: AppState,
    pub config: Option<BackendConfig>,
    pub devices: Vec<AudioDevice>,
    pub preview: String,
    pub error: String,
}

/// Observable store for one session
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Create a store in the initial `idle` state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Current application state
    pub fn state(&self) -> AppState {
        self.tx.borrow().state
    }

    /// Cached backend config, if one was ever loaded
    pub fn config(&self) -> Option<BackendConfig> {
        self.tx.borrow().config.clone()
    }

    /// Last enumerated device list
    pub fn devices(&self) -> Vec<AudioDevice> {
        self.tx.borrow().devices.clone()
    }

    /// Watch the store; the receiver wakes on every change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub(crate) fn set_config(&self, config: BackendConfig) {
        self.tx.send_modify(|s| s.config = Some(config));
    }

    pub(crate) fn set_devices(&self, devices: Vec<AudioDevice>) {
        self.tx.send_modify(|s| s.devices = devices);
    }

    /// Apply a transition's state and store-local effects in one step.
    ///
    /// # Returns
    /// `true` if the transition asked for a config reload
    pub(crate) fn apply(&self, transition: &Transition) -> bool {
        let mut reload = false;
        self.tx.send_modify(|s| {
            s.state = transition.state;
            for effect in &transition.effects {
                match effect {
                    Effect::ClearPreview => s.preview.clear(),
                    Effect::ClearError => s.error.clear(),
                    Effect::SetPreview(text) => s.preview = text.clone(),
                    Effect::SetError(message) => s.error = message.clone(),
                    Effect::ReloadConfig => reload = true,
                }
            }
        });
        reload
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{transition, BackendEvent};

    #[test]
    fn new_store_is_idle_and_empty() {
        let store = SessionStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.state, AppState::Idle);
        assert!(snapshot.config.is_none());
        assert!(snapshot.devices.is_empty());
        assert!(snapshot.preview.is_empty());
        assert!(snapshot.error.is_empty());
    }

    #[test]
    fn set_config_replaces_whole_value() {
        let store = SessionStore::new();
        store.set_config(BackendConfig {
            api_key: Some("k".into()),
            model: Some("m".into()),
            ..Default::default()
        });
        store.set_config(BackendConfig {
            audio_device: Some("USB".into()),
            ..Default::default()
        });

        let config = store.config().unwrap();
        assert!(config.api_key.is_none());
        assert!(config.model.is_none());
        assert_eq!(config.audio_device, Some("USB".into()));
    }

    #[test]
    fn apply_sets_state_and_effects() {
        let store = SessionStore::new();
        let t = transition(AppState::Processing, &BackendEvent::TranscriptionComplete("done".into()));
        assert!(!store.apply(&t));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.state, AppState::Success);
        assert_eq!(snapshot.preview, "done");
    }

    #[test]
    fn apply_reports_reload() {
        let store = SessionStore::new();
        let t = transition(AppState::Idle, &BackendEvent::ConfigUpdated);
        assert!(store.apply(&t));
        assert_eq!(store.state(), AppState::Idle);
    }

    #[tokio::test]
    async fn watchers_see_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.apply(&transition(AppState::Idle, &BackendEvent::RecordingStarted));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().state, AppState::Recording);
    }
}
