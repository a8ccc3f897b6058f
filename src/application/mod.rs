//! Application layer - Session orchestration and port interfaces
//!
//! Contains the synchronization controller, the observable session store
//! and the trait definitions for talking to the backend.

pub mod controller;
pub mod ports;
pub mod store;
pub mod subscriptions;

// Re-export use cases
pub use controller::{Lifecycle, SyncController, SyncError};
pub use store::{SessionSnapshot, SessionStore};
pub use subscriptions::SubscriptionSet;
