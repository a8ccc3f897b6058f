//! Backend-pushed events

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// All event names the session subscribes to, in subscription order
pub const ALL_EVENTS: &[EventName] = &[
    EventName::RecordingStarted,
    EventName::RecordingStopped,
    EventName::TranscriptionStarted,
    EventName::TranscriptionComplete,
    EventName::TranscriptionError,
    EventName::ConfigUpdated,
];

/// Names of the events the backend pushes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    RecordingStarted,
    RecordingStopped,
    TranscriptionStarted,
    TranscriptionComplete,
    TranscriptionError,
    ConfigUpdated,
}

impl EventName {
    /// Wire name of the event
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RecordingStarted => "recording-started",
            Self::RecordingStopped => "recording-stopped",
            Self::TranscriptionStarted => "transcription-started",
            Self::TranscriptionComplete => "transcription-complete",
            Self::TranscriptionError => "transcription-error",
            Self::ConfigUpdated => "config-updated",
        }
    }
}

impl FromStr for EventName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EVENTS
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown event: {}", s))
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single backend event with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    RecordingStarted,
    RecordingStopped,
    TranscriptionStarted,
    /// Carries the full transcribed text
    TranscriptionComplete(String),
    /// Carries the backend's error message
    TranscriptionError(String),
    ConfigUpdated,
}

impl BackendEvent {
    /// Name under which this event is delivered
    pub const fn name(&self) -> EventName {
        match self {
            Self::RecordingStarted => EventName::RecordingStarted,
            Self::RecordingStopped => EventName::RecordingStopped,
            Self::TranscriptionStarted => EventName::TranscriptionStarted,
            Self::TranscriptionComplete(_) => EventName::TranscriptionComplete,
            Self::TranscriptionError(_) => EventName::TranscriptionError,
            Self::ConfigUpdated => EventName::ConfigUpdated,
        }
    }

    /// Payload as it travels on the wire
    pub fn payload(&self) -> Value {
        match self {
            Self::TranscriptionComplete(text) => Value::String(text.clone()),
            Self::TranscriptionError(message) => Value::String(message.clone()),
            _ => Value::Null,
        }
    }

    /// Build an event from its wire name and payload.
    ///
    /// Payload-less events ignore whatever payload is attached. Text events
    /// require a string payload.
    pub fn from_wire(name: &str, payload: &Value) -> Result<Self, String> {
        let name: EventName = name.parse()?;
        let text = || {
            payload
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("event '{}' expects a string payload", name))
        };

        Ok(match name {
            EventName::RecordingStarted => Self::RecordingStarted,
            EventName::RecordingStopped => Self::RecordingStopped,
            EventName::TranscriptionStarted => Self::TranscriptionStarted,
            EventName::TranscriptionComplete => Self::TranscriptionComplete(text()?),
            EventName::TranscriptionError => Self::TranscriptionError(text()?),
            EventName::ConfigUpdated => Self::ConfigUpdated,
        })
    }
}
