//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod events;
pub mod gateway;

// Re-export common types
pub use config::ClientConfigStore;
pub use events::{Disposer, EventHandler, EventRegistry};
pub use gateway::{invoke_typed, BackendCommand, CommandGateway};
