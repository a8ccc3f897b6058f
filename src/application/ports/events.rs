//! Event subscription port interface

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::error::CommandFailure;
use crate::domain::session::{BackendEvent, EventName};

/// Handler invoked once per delivered event
pub type EventHandler = Arc<dyn Fn(&BackendEvent) + Send + Sync>;

/// Cancels one subscription.
///
/// Calling `dispose` more than once is a no-op. Once it has returned, the
/// handler it guards is never invoked again.
pub struct Disposer {
    action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Disposer {
    /// Create a disposer running `action` on first dispose
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            action: Mutex::new(Some(Box::new(action))),
        }
    }

    /// Cancel the subscription
    pub fn dispose(&self) {
        let action = self
            .action
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(action) = action {
            action();
        }
    }

    /// Whether the subscription has been cancelled
    pub fn is_disposed(&self) -> bool {
        self.action
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Port for backend-pushed events
#[async_trait]
pub trait EventRegistry: Send + Sync {
    /// Register `handler` for every event named `event`.
    ///
    /// Handlers for one name are invoked in emission order. Each
    /// subscription is independent; all of them see every event.
    fn subscribe(&self, event: EventName, handler: EventHandler) -> Disposer;

    /// Broadcast an event to every listener, peers included.
    async fn emit(&self, event: BackendEvent) -> Result<(), CommandFailure>;
}

#[async_trait]
impl<R: EventRegistry + ?Sized> EventRegistry for Arc<R> {
    fn subscribe(&self, event: EventName, handler: EventHandler) -> Disposer {
        self.as_ref().subscribe(event, handler)
    }

    async fn emit(&self, event: BackendEvent) -> Result<(), CommandFailure> {
        self.as_ref().emit(event).await
    }
}
