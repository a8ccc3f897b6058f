//! In-process event registry

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;

use crate::application::ports::{Disposer, EventHandler, EventRegistry};
use crate::domain::error::CommandFailure;
use crate::domain::session::{BackendEvent, EventName};

/// Slot holding a live handler; emptied on dispose
type Slot = Arc<Mutex<Option<EventHandler>>>;

struct Entry {
    id: u64,
    name: EventName,
    slot: Slot,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Fan-out registry living in this process.
///
/// `publish` calls handlers synchronously, in subscription order. Each call
/// runs under its subscription's slot lock, so a dispose either waits for an
/// in-flight call or prevents it. A handler must not dispose its own
/// subscription from inside the call.
#[derive(Clone, Default)]
pub struct LocalEventRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl LocalEventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every live handler for its name.
    ///
    /// # Returns
    /// The number of handlers invoked
    pub fn publish(&self, event: &BackendEvent) -> usize {
        let slots: Vec<Slot> = lock(&self.inner)
            .entries
            .iter()
            .filter(|e| e.name == event.name())
            .map(|e| Arc::clone(&e.slot))
            .collect();

        let mut delivered = 0;
        for slot in slots {
            let guard = lock(&slot);
            if let Some(handler) = guard.as_ref() {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Live subscriptions for `name`
    pub fn subscriber_count(&self, name: EventName) -> usize {
        lock(&self.inner)
            .entries
            .iter()
            .filter(|e| e.name == name)
            .count()
    }

    fn remove(inner: &Weak<Mutex<Inner>>, id: u64) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let slot = {
            let mut guard = lock(&inner);
            let position = guard.entries.iter().position(|e| e.id == id);
            position.map(|p| guard.entries.remove(p).slot)
        };
        if let Some(slot) = slot {
            lock(&slot).take();
        }
    }
}

#[async_trait]
impl EventRegistry for LocalEventRegistry {
    fn subscribe(&self, event: EventName, handler: EventHandler) -> Disposer {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push(Entry {
                id,
                name: event,
                slot: Arc::new(Mutex::new(Some(handler))),
            });
            id
        };

        let inner = Arc::downgrade(&self.inner);
        Disposer::new(move || Self::remove(&inner, id))
    }

    async fn emit(&self, event: BackendEvent) -> Result<(), CommandFailure> {
        self.publish(&event);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
