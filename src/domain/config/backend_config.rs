//! Backend configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::shortcut::DEFAULT_SHORTCUT;

/// Configuration persisted by the backend.
///
/// The session only holds a cached copy, always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub audio_device: Option<String>,
    pub model: Option<String>,
    pub shortcut: Option<String>,
}

impl BackendConfig {
    /// Copy with an empty or whitespace-only API key replaced by `None`
    pub fn normalized(self) -> Self {
        Self {
            api_key: self.api_key.filter(|key| !key.trim().is_empty()),
            ..self
        }
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    /// Shortcut string, or the backend default if not set
    pub fn shortcut_or_default(&self) -> &str {
        self.shortcut.as_deref().unwrap_or(DEFAULT_SHORTCUT)
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() <= 4 {
                "*".repeat(chars.len())
            } else {
                let visible: String = chars[chars.len() - 4..].iter().collect();
                format!("{}{}", "*".repeat(chars.len() - 4), visible)
            }
        })
    }
}
