//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the Unix
//! socket backend connection, the in-process event registry and the
//! XDG client config store.

pub mod config;
pub mod events;
pub mod ipc;

// Re-export adapters
pub use config::XdgClientConfigStore;
pub use events::LocalEventRegistry;
pub use ipc::{SocketPath, TransportError, UnixSocketBackend};
