//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::ipc::SOCKET_ENV;

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV: &str = "OPEN_VOICE_LOG";

/// Environment variable overriding the client config file location
pub const CLIENT_CONFIG_ENV: &str = "OPEN_VOICE_CLIENT_CONFIG";

/// Open Voice - terminal client for the voice-to-clipboard backend
#[derive(Parser, Debug)]
#[command(name = "open-voice")]
#[command(version)]
#[command(about = "Terminal client for the Open Voice transcription backend")]
#[command(long_about = None)]
pub struct Cli {
    /// Backend socket path
    #[arg(long, global = true, value_name = "PATH", env = SOCKET_ENV)]
    pub socket: Option<String>,

    /// Log level or filter directive (e.g. debug, open_voice=trace)
    #[arg(long, global = true, value_name = "LEVEL", env = LOG_LEVEL_ENV)]
    pub log_level: Option<String>,

    /// Client config file (defaults to the XDG config dir)
    #[arg(long, global = true, value_name = "FILE", env = CLIENT_CONFIG_ENV)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow the recording session and print every state change
    Watch,
    /// Start recording if idle, stop if recording
    Toggle,
    /// List audio input devices
    Devices,
    /// Hide the backend settings window
    HideSettings,
    /// Read or change the backend configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage this client's own config file
    ClientConfig {
        #[command(subcommand)]
        action: ClientConfigAction,
    },
}

/// Backend config actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the backend configuration
    Show,
    /// Select the recording device
    SetDevice(DeviceArgs),
    /// Set the transcription API key (empty clears it)
    SetKey {
        /// API key
        key: String,
    },
    /// Set the transcription model
    SetModel {
        /// Model name
        model: String,
    },
    /// Register a new global shortcut (e.g. Ctrl+Shift+V)
    SetShortcut {
        /// Key combination
        shortcut: String,
    },
}

/// Device selection; exactly one of a name or `--none`
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct DeviceArgs {
    /// Device name as listed by `devices`
    pub name: Option<String>,

    /// Fall back to the system default device
    #[arg(long)]
    pub none: bool,
}

impl DeviceArgs {
    /// Selected device, `None` for the system default
    pub fn device(&self) -> Option<String> {
        if self.none {
            None
        } else {
            self.name.clone()
        }
    }
}

/// Client config actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ClientConfigAction {
    /// Show config file path
    Path,
    /// Create config file with defaults
    Init,
    /// Show effective client settings
    Show,
}
