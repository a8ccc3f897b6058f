//! Audio input device snapshot

use serde::{Deserialize, Serialize};

/// An input device as enumerated by the backend.
///
/// A snapshot only: it goes stale as soon as it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub name: String,
    pub is_default: bool,
}

impl AudioDevice {
    pub fn new(name: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            is_default,
        }
    }
}

/// Find the default device in a snapshot, if the backend marked one
pub fn default_device(devices: &[AudioDevice]) -> Option<&AudioDevice> {
    devices.iter().find(|d| d.is_default)
}
