//! Domain layer - Core session logic
//!
//! Contains value objects, the session state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod device;
pub mod error;
pub mod session;
pub mod shortcut;

// Re-export common types
pub use config::{BackendConfig, ClientConfig};
pub use device::AudioDevice;
pub use error::*;
pub use session::{AppState, BackendEvent, Effect, EventName, Transition};
pub use shortcut::Shortcut;
