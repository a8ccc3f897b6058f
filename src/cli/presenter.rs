//! CLI presenter for output formatting

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::SessionSnapshot;
use crate::domain::config::BackendConfig;
use crate::domain::device::AudioDevice;
use crate::domain::session::AppState;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    is_spinner_active: Arc<AtomicBool>,
    last_state: Option<AppState>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: None,
            is_spinner_active: Arc::new(AtomicBool::new(false)),
            last_state: None,
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
        self.is_spinner_active.store(true, Ordering::SeqCst);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(format!("{} {}", "✓".green(), message)),
            None => self.success(message),
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(format!("{} {}", "✗".red(), message)),
            None => self.error(message),
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Whether a spinner is currently shown
    pub fn is_spinner_active(&self) -> bool {
        self.is_spinner_active.load(Ordering::SeqCst)
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config show)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Render a session snapshot, printing only state changes.
    pub fn render_session(&mut self, snapshot: &SessionSnapshot) {
        if self.last_state == Some(snapshot.state) {
            return;
        }
        self.last_state = Some(snapshot.state);

        match snapshot.state {
            AppState::Idle => {
                self.stop_spinner();
                eprintln!("{} {}", "●".cyan(), describe_session(snapshot));
            }
            AppState::Recording => {
                self.stop_spinner();
                eprintln!("{} {}", "●".red(), describe_session(snapshot));
            }
            AppState::Processing => self.start_spinner(&describe_session(snapshot)),
            AppState::Success => {
                self.spinner_success("Transcribed");
                self.output(&snapshot.preview);
            }
            AppState::Error => self.spinner_fail(&describe_session(snapshot)),
        }
    }

    /// Print the backend configuration
    pub fn backend_config(&self, config: &BackendConfig, shortcut: Option<&str>) {
        self.key_value("api_key", &describe_api_key(config));
        self.key_value(
            "audio_device",
            config.audio_device.as_deref().unwrap_or("(system default)"),
        );
        self.key_value("model", config.model.as_deref().unwrap_or("(backend default)"));
        self.key_value(
            "shortcut",
            shortcut.unwrap_or_else(|| config.shortcut_or_default()),
        );
    }

    /// Print the device list, marking the system default
    pub fn devices(&self, devices: &[AudioDevice]) {
        if devices.is_empty() {
            self.warn("No audio input devices found");
            return;
        }
        for device in devices {
            self.output(&format_device(device));
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Masked API key, or a placeholder when none is usable
pub fn describe_api_key(config: &BackendConfig) -> String {
    if !config.has_api_key() {
        return "(not set)".to_string();
    }
    config.masked_api_key().unwrap_or_default()
}

/// One-line description of the session state
pub fn describe_session(snapshot: &SessionSnapshot) -> String {
    match snapshot.state {
        AppState::Idle => "Ready".to_string(),
        AppState::Recording => "Recording...".to_string(),
        AppState::Processing => "Transcribing...".to_string(),
        AppState::Success => format!("Transcribed: {}", snapshot.preview),
        AppState::Error => format!("Transcription failed: {}", snapshot.error),
    }
}

/// Device line as printed by `devices`
pub fn format_device(device: &AudioDevice) -> String {
    if device.is_default {
        format!("{} (default)", device.name)
    } else {
        device.name.clone()
    }
}
