//! Unix Domain Socket connection to the backend
//!
//! One connection carries requests, responses and pushed events. A reader
//! task routes responses to their callers by id and publishes events to a
//! [`LocalEventRegistry`] in the order they arrive.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{oneshot, Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::socket_path::SocketPath;
use super::wire::{self, Incoming};
use super::TransportError;
use crate::application::ports::{BackendCommand, CommandGateway, Disposer, EventHandler, EventRegistry};
use crate::domain::error::CommandFailure;
use crate::domain::session::{BackendEvent, EventName};
use crate::infrastructure::events::LocalEventRegistry;

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, String>>>>>;

/// Backend connection acting as both command gateway and event registry
pub struct UnixSocketBackend {
    writer: AsyncMutex<OwnedWriteHalf>,
    pending: Pending,
    next_id: AtomicU64,
    connected: Arc<AtomicBool>,
    disconnected: Arc<Notify>,
    events: LocalEventRegistry,
    reader: JoinHandle<()>,
}

impl UnixSocketBackend {
    /// Connect to the backend socket and start the reader task
    pub async fn connect(socket_path: &SocketPath) -> Result<Self, TransportError> {
        let stream = UnixStream::connect(socket_path.path())
            .await
            .map_err(|source| TransportError::Connect {
                path: socket_path.path().display().to_string(),
                source,
            })?;
        Ok(Self::from_stream(stream))
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: UnixStream) -> Self {
        let (reader, writer) = stream.into_split();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let connected = Arc::new(AtomicBool::new(true));
        let disconnected = Arc::new(Notify::new());
        let events = LocalEventRegistry::new();

        let reader = tokio::spawn(read_loop(
            reader,
            Arc::clone(&pending),
            Arc::clone(&connected),
            Arc::clone(&disconnected),
            events.clone(),
        ));

        Self {
            writer: AsyncMutex::new(writer),
            pending,
            next_id: AtomicU64::new(1),
            connected,
            disconnected,
            events,
            reader,
        }
    }

    /// Whether the connection is still open
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Resolves once the backend has closed the connection
    pub async fn closed(&self) {
        let notified = self.disconnected.notified();
        if !self.is_connected() {
            return;
        }
        notified.await;
    }

    /// Registry the reader task publishes events to
    pub fn events(&self) -> &LocalEventRegistry {
        &self.events
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await
    }
}

impl Drop for UnixSocketBackend {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl CommandGateway for UnixSocketBackend {
    async fn invoke(&self, command: BackendCommand, args: Value) -> Result<Value, CommandFailure> {
        let name = command.as_str();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let line = wire::encode_request(id, name, &args)
            .map_err(|e| CommandFailure::new(name, format!("failed to encode request: {}", e)))?;

        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(id, tx);
        // Checked after registering so a concurrent disconnect cannot strand the call.
        if !self.is_connected() {
            lock(&self.pending).remove(&id);
            return Err(CommandFailure::new(name, "backend connection closed"));
        }

        if let Err(e) = self.write_line(&line).await {
            lock(&self.pending).remove(&id);
            return Err(CommandFailure::new(name, format!("failed to send request: {}", e)));
        }
        debug!(command = name, id, "sent backend command");

        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(CommandFailure::new(name, message)),
            Err(_) => Err(CommandFailure::new(name, "backend connection closed")),
        }
    }
}

#[async_trait]
impl EventRegistry for UnixSocketBackend {
    fn subscribe(&self, event: EventName, handler: EventHandler) -> Disposer {
        self.events.subscribe(event, handler)
    }

    /// The backend echoes broadcasts to every client, this one included.
    async fn emit(&self, event: BackendEvent) -> Result<(), CommandFailure> {
        let name = event.name().as_str();
        if !self.is_connected() {
            return Err(CommandFailure::new(name, "backend connection closed"));
        }
        let line = wire::encode_emit(&event)
            .map_err(|e| CommandFailure::new(name, format!("failed to encode event: {}", e)))?;
        self.write_line(&line)
            .await
            .map_err(|e| CommandFailure::new(name, format!("failed to send event: {}", e)))
    }
}

async fn read_loop(
    reader: OwnedReadHalf,
    pending: Pending,
    connected: Arc<AtomicBool>,
    disconnected: Arc<Notify>,
    events: LocalEventRegistry,
) {
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("backend closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "backend connection error");
                break;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match wire::decode(&line) {
            Ok(Incoming::Response { id, result }) => match lock(&pending).remove(&id) {
                Some(tx) => {
                    let _ = tx.send(result);
                }
                None => warn!(id, "response for unknown request"),
            },
            Ok(Incoming::Event(event)) => {
                debug!(event = %event.name(), "backend event");
                events.publish(&event);
            }
            Err(e) => warn!(error = %e, "ignoring backend frame"),
        }
    }

    connected.store(false, Ordering::SeqCst);
    // Dropping the senders fails every waiting call.
    lock(&pending).clear();
    disconnected.notify_waiters();
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
