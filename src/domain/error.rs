//! Domain error types

use thiserror::Error;

/// A backend command that did not produce a usable result.
///
/// Covers backend-reported errors, transport loss and responses that could
/// not be decoded into the expected type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Backend command '{command}' failed: {cause}")]
pub struct CommandFailure {
    pub command: String,
    pub cause: String,
}

impl CommandFailure {
    pub fn new(command: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cause: cause.into(),
        }
    }
}

/// Error when parsing a keyboard shortcut string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutParseError {
    #[error("Empty shortcut string")]
    Empty,

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("No key specified in shortcut: \"{0}\"")]
    MissingKey(String),

    #[error("Shortcut \"{0}\" names more than one key")]
    MultipleKeys(String),
}

/// Error when the client configuration file cannot be handled
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),

    #[error("Invalid {key} \"{value}\": {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
