//! XDG client config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ClientConfigStore;
use crate::domain::config::ClientConfig;
use crate::domain::error::ConfigError;

/// XDG-compliant store for `client.toml`
pub struct XdgClientConfigStore {
    path: PathBuf,
}

impl XdgClientConfigStore {
    /// Create a new XDG config store with default path
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("open-voice");

        Self {
            path: config_dir.join("client.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<ClientConfig, ConfigError> {
        let config: ClientConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    async fn write(&self, config: &ClientConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgClientConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientConfigStore for XdgClientConfigStore {
    async fn load(&self) -> Result<ClientConfig, ConfigError> {
        if !self.exists() {
            return Ok(ClientConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.write(&ClientConfig::defaults()).await
    }
}
