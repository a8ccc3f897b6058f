//! Command gateway port interface

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::error::CommandFailure;

/// Commands the backend recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCommand {
    LoadConfig,
    SaveConfig,
    SetAudioDevice,
    GetAudioDevices,
    ToggleRecording,
    UpdateShortcut,
    GetCurrentShortcut,
    HideSettings,
}

impl BackendCommand {
    /// Wire name of the command
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoadConfig => "load_config",
            Self::SaveConfig => "save_config",
            Self::SetAudioDevice => "set_audio_device",
            Self::GetAudioDevices => "get_audio_devices",
            Self::ToggleRecording => "toggle_recording",
            Self::UpdateShortcut => "update_shortcut",
            Self::GetCurrentShortcut => "get_current_shortcut",
            Self::HideSettings => "hide_settings",
        }
    }
}

impl fmt::Display for BackendCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Port for request/response calls to the backend
#[async_trait]
pub trait CommandGateway: Send + Sync {
    /// Invoke a backend command.
    ///
    /// # Arguments
    /// * `command` - The command to run
    /// * `args` - A flat JSON object of arguments, or `Value::Null` for none
    ///
    /// # Returns
    /// The raw JSON response, or a failure for backend, transport or
    /// decoding errors. No retries happen at this level.
    async fn invoke(&self, command: BackendCommand, args: Value) -> Result<Value, CommandFailure>;
}

/// Shared gateways, so several sessions can talk over one connection
#[async_trait]
impl<G: CommandGateway + ?Sized> CommandGateway for Arc<G> {
    async fn invoke(&self, command: BackendCommand, args: Value) -> Result<Value, CommandFailure> {
        self.as_ref().invoke(command, args).await
    }
}

/// Invoke a command and decode its response into `T`.
///
/// A response that does not match `T` is reported as a failure of the command.
pub async fn invoke_typed<G, T>(
    gateway: &G,
    command: BackendCommand,
    args: Value,
) -> Result<T, CommandFailure>
where
    G: CommandGateway + ?Sized,
    T: DeserializeOwned,
{
    let value = gateway.invoke(command, args).await?;
    serde_json::from_value(value)
        .map_err(|e| CommandFailure::new(command.as_str(), format!("malformed response: {}", e)))
}
