//! Config command handlers

use crate::application::ports::{ClientConfigStore, CommandGateway, EventRegistry};
use crate::application::SyncController;
use crate::domain::config::{BackendConfig, ClientConfig};
use crate::domain::error::ConfigError;

use super::app::{parse_shortcut, socket_path, CliError};
use super::args::{ClientConfigAction, ConfigAction};
use super::presenter::Presenter;

/// Handle backend config subcommand
pub async fn handle_config_command<G, R>(
    action: ConfigAction,
    session: &SyncController<G, R>,
    presenter: &Presenter,
) -> Result<(), CliError>
where
    G: CommandGateway,
    R: EventRegistry,
{
    match action {
        ConfigAction::Show => handle_show(session, presenter).await,
        ConfigAction::SetDevice(args) => handle_set_device(session, presenter, args.device()).await,
        ConfigAction::SetKey { key } => {
            let key = Some(key).filter(|k| !k.trim().is_empty());
            let shown = key
                .as_deref()
                .map(mask_api_key)
                .unwrap_or_else(|| "(cleared)".to_string());
            update_config(session, presenter, "api_key", &shown, |c| c.api_key = key).await
        }
        ConfigAction::SetModel { model } => {
            let model = Some(model).filter(|m| !m.trim().is_empty());
            let shown = model.clone().unwrap_or_else(|| "(backend default)".to_string());
            update_config(session, presenter, "model", &shown, |c| c.model = model).await
        }
        ConfigAction::SetShortcut { shortcut } => {
            handle_set_shortcut(session, presenter, &shortcut).await
        }
    }
}

async fn handle_show<G: CommandGateway, R: EventRegistry>(
    session: &SyncController<G, R>,
    presenter: &Presenter,
) -> Result<(), CliError> {
    let config = load_backend_config(session).await?;
    let shortcut = session.current_shortcut().await;
    presenter.backend_config(&config, shortcut.as_deref());
    Ok(())
}

async fn handle_set_device<G: CommandGateway, R: EventRegistry>(
    session: &SyncController<G, R>,
    presenter: &Presenter,
    device: Option<String>,
) -> Result<(), CliError> {
    if let Some(name) = device.as_deref() {
        session.load_devices().await;
        let devices = session.store().devices();
        // An empty list means enumeration failed; let the backend decide.
        if !devices.is_empty() && !devices.iter().any(|d| d.name == name) {
            return Err(CliError::Usage(format!(
                "Unknown audio device '{}'. Run 'open-voice devices' to list them",
                name
            )));
        }
    }

    let shown = device
        .clone()
        .unwrap_or_else(|| "(system default)".to_string());
    update_config(session, presenter, "audio_device", &shown, |c| {
        c.audio_device = device
    })
    .await
}

async fn handle_set_shortcut<G: CommandGateway, R: EventRegistry>(
    session: &SyncController<G, R>,
    presenter: &Presenter,
    shortcut: &str,
) -> Result<(), CliError> {
    let shortcut = parse_shortcut(shortcut)?;

    if !session.update_shortcut(&shortcut.to_string()).await {
        return Err(CliError::Failed(format!(
            "Backend could not register shortcut {}",
            shortcut
        )));
    }
    presenter.success(&format!("shortcut = {}", shortcut));
    Ok(())
}

/// Load, modify and save the backend config through the save procedure
async fn update_config<G, R, F>(
    session: &SyncController<G, R>,
    presenter: &Presenter,
    key: &str,
    shown: &str,
    apply: F,
) -> Result<(), CliError>
where
    G: CommandGateway,
    R: EventRegistry,
    F: FnOnce(&mut BackendConfig),
{
    let mut config = load_backend_config(session).await?;
    apply(&mut config);

    if !session.save_config(config).await {
        return Err(CliError::Failed(
            "Backend rejected the configuration".to_string(),
        ));
    }
    presenter.success(&format!("{} = {}", key, shown));
    Ok(())
}

async fn load_backend_config<G: CommandGateway, R: EventRegistry>(
    session: &SyncController<G, R>,
) -> Result<BackendConfig, CliError> {
    session.load_config().await;
    session
        .store()
        .config()
        .ok_or_else(|| CliError::Failed("Could not load backend configuration".to_string()))
}

/// Handle client-config subcommand
pub async fn handle_client_config_command<S: ClientConfigStore>(
    action: ClientConfigAction,
    store: &S,
    effective: &ClientConfig,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ClientConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
        }
        ClientConfigAction::Init => {
            store.init().await?;
            presenter.success(&format!(
                "Config file created at: {}",
                store.path().display()
            ));
        }
        ClientConfigAction::Show => {
            // Surfaces a broken file that startup silently fell back from.
            store.load().await?;
            presenter.key_value(
                "socket_path",
                &socket_path(effective).path().to_string_lossy(),
            );
            presenter.key_value("log_level", effective.log_level_or_default());
            if !store.exists() {
                presenter.info("No config file; showing defaults");
            }
        }
    }
    Ok(())
}

/// Mask API key for display (only the last 4 chars stay visible)
fn mask_api_key(key: &str) -> String {
    BackendConfig {
        api_key: Some(key.to_string()),
        ..Default::default()
    }
    .masked_api_key()
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::application::ports::BackendCommand;
    use crate::cli::args::DeviceArgs;
    use crate::domain::error::CommandFailure;
    use crate::infrastructure::LocalEventRegistry;

    /// Backend keeping its config in memory
    struct MemoryBackend {
        config: Mutex<Value>,
        shortcuts: Mutex<Vec<String>>,
    }

    impl MemoryBackend {
        fn new(config: Value) -> Self {
            Self {
                config: Mutex::new(config),
                shortcuts: Mutex::new(Vec::new()),
            }
        }

        fn config(&self) -> Value {
            self.config.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandGateway for MemoryBackend {
        async fn invoke(&self, command: BackendCommand, args: Value) -> Result<Value, CommandFailure> {
            match command {
                BackendCommand::LoadConfig => Ok(self.config()),
                BackendCommand::SaveConfig => {
                    *self.config.lock().unwrap() = args["config"].clone();
                    Ok(Value::Null)
                }
                BackendCommand::GetAudioDevices => Ok(json!([
                    { "name": "Built-in", "is_default": true },
                    { "name": "USB Mic", "is_default": false }
                ])),
                BackendCommand::UpdateShortcut => {
                    let shortcut = args["newShortcut"].as_str().unwrap_or_default();
                    self.shortcuts.lock().unwrap().push(shortcut.to_string());
                    Ok(Value::Null)
                }
                _ => Ok(Value::Null),
            }
        }
    }

    fn session(config: Value) -> SyncController<std::sync::Arc<MemoryBackend>, LocalEventRegistry> {
        SyncController::new(
            std::sync::Arc::new(MemoryBackend::new(config)),
            LocalEventRegistry::new(),
        )
    }

    #[test]
    fn mask_api_key_long() {
        assert_eq!(mask_api_key("abcdefghijklmnop"), "************mnop");
        assert_eq!(mask_api_key("abc"), "***");
    }

    #[tokio::test]
    async fn set_device_saves_known_device() {
        let backend = std::sync::Arc::new(MemoryBackend::new(json!({ "api_key": "k" })));
        let session = SyncController::new(std::sync::Arc::clone(&backend), LocalEventRegistry::new());
        let action = ConfigAction::SetDevice(DeviceArgs {
            name: Some("USB Mic".into()),
            none: false,
        });

        handle_config_command(action, &session, &Presenter::new())
            .await
            .unwrap();
        assert_eq!(backend.config()["audio_device"], "USB Mic");
        assert_eq!(backend.config()["api_key"], "k");
    }

    #[tokio::test]
    async fn set_device_rejects_unknown_device() {
        let session = session(json!({}));
        let action = ConfigAction::SetDevice(DeviceArgs {
            name: Some("Nope".into()),
            none: false,
        });

        let err = handle_config_command(action, &session, &Presenter::new())
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), super::super::app::EXIT_USAGE_ERROR);
    }

    #[tokio::test]
    async fn blank_key_is_cleared() {
        let backend = std::sync::Arc::new(MemoryBackend::new(json!({ "api_key": "old" })));
        let session = SyncController::new(std::sync::Arc::clone(&backend), LocalEventRegistry::new());

        handle_config_command(
            ConfigAction::SetKey { key: "  ".into() },
            &session,
            &Presenter::new(),
        )
        .await
        .unwrap();
        assert_eq!(backend.config()["api_key"], Value::Null);
    }

    #[tokio::test]
    async fn invalid_shortcut_is_usage_error() {
        let session = session(json!({}));
        let err = handle_config_command(
            ConfigAction::SetShortcut {
                shortcut: "Ctrl+Shift".into(),
            },
            &session,
            &Presenter::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[tokio::test]
    async fn shortcut_is_sent_canonical() {
        let backend = std::sync::Arc::new(MemoryBackend::new(json!({})));
        let session = SyncController::new(std::sync::Arc::clone(&backend), LocalEventRegistry::new());

        handle_config_command(
            ConfigAction::SetShortcut {
                shortcut: "alt+shift+r".into(),
            },
            &session,
            &Presenter::new(),
        )
        .await
        .unwrap();
        assert_eq!(*backend.shortcuts.lock().unwrap(), vec!["Shift+Alt+R"]);
    }
}
