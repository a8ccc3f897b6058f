//! Client configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Default log filter when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Settings owned by this client (not by the backend).
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub socket_path: Option<String>,
    pub log_level: Option<String>,
}

impl ClientConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            socket_path: None,
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            socket_path: other.socket_path.or(self.socket_path),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Check the values a config file may carry.
    ///
    /// `log_level` is a comma-separated list of `level` or `target=level`
    /// directives; `socket_path` must not be blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.socket_path {
            if path.trim().is_empty() {
                return Err(invalid("socket_path", path, "path is empty"));
            }
        }

        if let Some(filter) = &self.log_level {
            for directive in filter.split(',').map(str::trim) {
                let level = match directive.split_once('=') {
                    Some((target, level)) if !target.trim().is_empty() => level.trim(),
                    Some(_) => return Err(invalid("log_level", filter, "directive has no target")),
                    None => directive,
                };
                if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                    return Err(invalid(
                        "log_level",
                        filter,
                        &format!("expected one of {}", LOG_LEVELS.join(", ")),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Get log level, or "info" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
