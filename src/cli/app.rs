//! Command runners for the terminal client

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::application::ports::{invoke_typed, BackendCommand, ClientConfigStore, CommandGateway};
use crate::application::{SyncController, SyncError};
use crate::domain::config::ClientConfig;
use crate::domain::device::AudioDevice;
use crate::domain::error::{CommandFailure, ConfigError};
use crate::domain::shortcut::Shortcut;
use crate::infrastructure::{SocketPath, TransportError, UnixSocketBackend};

use super::args::{Cli, Commands, ConfigAction};
use super::config_cmd::{handle_client_config_command, handle_config_command};
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Shared backend connection
pub type Backend = Arc<UnixSocketBackend>;

/// Session controller over one backend connection
pub type Session = SyncController<Backend, Backend>;

/// Errors surfaced to the terminal
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandFailure),

    #[error(transparent)]
    Session(#[from] SyncError),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Failed(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Load and merge client configuration: defaults < file < CLI/env
pub async fn load_client_config<S: ClientConfigStore>(store: &S, cli: &Cli) -> ClientConfig {
    let file_config = store.load().await.unwrap_or_else(|_| ClientConfig::empty());

    let cli_config = ClientConfig {
        socket_path: cli.socket.clone().filter(|s| !s.is_empty()),
        log_level: cli.log_level.clone().filter(|s| !s.is_empty()),
    };

    ClientConfig::defaults().merge(file_config).merge(cli_config)
}

/// Parse a user-supplied shortcut, reporting failures as usage errors
pub fn parse_shortcut(shortcut: &str) -> Result<Shortcut, CliError> {
    shortcut
        .parse()
        .map_err(|e| CliError::Usage(format!("Invalid shortcut: {}", e)))
}

/// Socket the client connects to
pub fn socket_path(config: &ClientConfig) -> SocketPath {
    config
        .socket_path
        .as_ref()
        .map(SocketPath::from_path)
        .unwrap_or_default()
}

/// Open the backend connection
pub async fn connect(config: &ClientConfig) -> Result<Backend, CliError> {
    let backend = UnixSocketBackend::connect(&socket_path(config)).await?;
    Ok(Arc::new(backend))
}

/// Inactive controller for one-shot commands
pub fn session(backend: &Backend) -> Session {
    SyncController::new(Arc::clone(backend), Arc::clone(backend))
}

/// Dispatch a parsed command
pub async fn run<S: ClientConfigStore>(
    command: Commands,
    config: &ClientConfig,
    store: &S,
    presenter: &mut Presenter,
) -> Result<(), CliError> {
    match command {
        Commands::ClientConfig { action } => {
            handle_client_config_command(action, store, config, presenter).await?;
            Ok(())
        }
        Commands::Watch => run_watch(connect(config).await?, presenter).await,
        Commands::Toggle => run_toggle(connect(config).await?, presenter).await,
        Commands::Devices => run_devices(connect(config).await?, presenter).await,
        Commands::HideSettings => run_hide_settings(connect(config).await?).await,
        Commands::Config { action } => {
            if let ConfigAction::SetShortcut { shortcut } = &action {
                parse_shortcut(shortcut)?;
            }
            let backend = connect(config).await?;
            handle_config_command(action, &session(&backend), presenter).await
        }
    }
}

/// Follow the session until Ctrl+C or until the backend goes away
pub async fn run_watch(backend: Backend, presenter: &mut Presenter) -> Result<(), CliError> {
    let shutdown = ShutdownSignal::new();
    shutdown
        .setup()
        .await
        .map_err(|e| CliError::Failed(format!("Failed to setup signal handler: {}", e)))?;

    let controller = Arc::new(session(&backend));
    controller.activate().await?;

    let mut updates = controller.store().subscribe();
    let initial = updates.borrow_and_update().clone();
    presenter.render_session(&initial);

    let runner = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.run().await })
    };

    let result = loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot = updates.borrow_and_update().clone();
                presenter.render_session(&snapshot);
            }
            _ = shutdown.wait() => {
                presenter.stop_spinner();
                break Ok(());
            }
            _ = backend.closed() => {
                presenter.stop_spinner();
                break Err(CliError::Failed("Backend closed the connection".into()));
            }
        }
    };

    controller.teardown();
    let _ = runner.await;
    result
}

/// Ask the backend to start or stop recording
pub async fn run_toggle(backend: Backend, presenter: &Presenter) -> Result<(), CliError> {
    backend
        .invoke(BackendCommand::ToggleRecording, Value::Null)
        .await?;
    presenter.success("Toggled recording");
    Ok(())
}

/// Print the available input devices
pub async fn run_devices(backend: Backend, presenter: &Presenter) -> Result<(), CliError> {
    let devices: Vec<AudioDevice> =
        invoke_typed(&backend, BackendCommand::GetAudioDevices, Value::Null).await?;
    presenter.devices(&devices);
    Ok(())
}

/// Hide the backend settings window
pub async fn run_hide_settings(backend: Backend) -> Result<(), CliError> {
    session(&backend).hide_settings().await;
    Ok(())
}
