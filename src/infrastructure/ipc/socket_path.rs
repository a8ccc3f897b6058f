//! Backend socket path resolution

use std::path::{Path, PathBuf};

/// Environment variable overriding the socket location
pub const SOCKET_ENV: &str = "OPEN_VOICE_SOCKET";

const SOCKET_FILE: &str = "open-voice.sock";

/// Socket path resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Resolve from `OPEN_VOICE_SOCKET`, then `XDG_RUNTIME_DIR`, then the temp dir
    pub fn new() -> Self {
        if let Ok(explicit) = std::env::var(SOCKET_ENV) {
            if !explicit.trim().is_empty() {
                return Self::from_path(explicit);
            }
        }
        Self::from_path(Self::runtime_default())
    }

    /// Use an explicit path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location under the runtime dir, ignoring any override
    pub fn runtime_default() -> PathBuf {
        std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join(SOCKET_FILE))
            .unwrap_or_else(|_| std::env::temp_dir().join(SOCKET_FILE))
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if socket file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}
