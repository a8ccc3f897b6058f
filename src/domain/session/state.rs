//! UI-visible application state

use std::fmt;

/// The closed set of states the view layer can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Idle,
    Recording,
    Processing,
    Success,
    Error,
}

impl AppState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Whether the backend is busy with the current capture
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Recording | Self::Processing)
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
