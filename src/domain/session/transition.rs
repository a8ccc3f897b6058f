//! Session state machine
//!
//! Pure mapping from `(state, event)` to the next state plus the effects the
//! controller must apply. No I/O happens here.
//!
//! State machine:
//!   ANY       -> RECORDING  (recording-started, clears preview and error)
//!   RECORDING -> PROCESSING (recording-stopped)
//!   ANY       -> PROCESSING (transcription-started)
//!   ANY       -> SUCCESS    (transcription-complete, sets preview)
//!   ANY       -> ERROR      (transcription-error, sets error)
//!   ANY       -> unchanged  (config-updated, reloads config)

use super::event::BackendEvent;
use super::excerpt::{error_excerpt, preview_excerpt};
use super::state::AppState;

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ClearPreview,
    ClearError,
    SetPreview(String),
    SetError(String),
    /// Run the configuration load procedure again
    ReloadConfig,
}

/// Result of feeding one event to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: AppState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// Compute the next state and effects for `event` received in `current`.
///
/// Success clears a stale error and error clears a stale preview, so at most
/// one transient field is populated after any transition.
pub fn transition(current: AppState, event: &BackendEvent) -> Transition {
    match event {
        BackendEvent::RecordingStarted => Transition::with(
            AppState::Recording,
            vec![Effect::ClearPreview, Effect::ClearError],
        ),
        BackendEvent::RecordingStopped => match current {
            AppState::Recording => Transition::to(AppState::Processing),
            // Stop may trail transcription-started; nothing to do then.
            other => Transition::to(other),
        },
        BackendEvent::TranscriptionStarted => Transition::to(AppState::Processing),
        BackendEvent::TranscriptionComplete(text) => Transition::with(
            AppState::Success,
            vec![Effect::SetPreview(preview_excerpt(text)), Effect::ClearError],
        ),
        BackendEvent::TranscriptionError(message) => Transition::with(
            AppState::Error,
            vec![Effect::SetError(error_excerpt(message)), Effect::ClearPreview],
        ),
        BackendEvent::ConfigUpdated => Transition::with(current, vec![Effect::ReloadConfig]),
    }
}
