//! Configuration value objects

pub mod backend_config;
pub mod client_config;

pub use backend_config::BackendConfig;
pub use client_config::{ClientConfig, DEFAULT_LOG_LEVEL};
