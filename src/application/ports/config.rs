//! Client configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::ClientConfig;
use crate::domain::error::ConfigError;

/// Where `client.toml` lives and how it is read.
///
/// The client never edits its own settings at runtime; the file is only
/// created once by `init` and otherwise hand-edited.
#[async_trait]
pub trait ClientConfigStore: Send + Sync {
    /// Load and validate the file. A missing file yields an empty config.
    async fn load(&self) -> Result<ClientConfig, ConfigError>;

    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write the defaults. Fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}
