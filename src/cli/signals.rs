//! Shutdown signal handling for the watch loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::debug;

/// Shutdown signal raised by SIGINT (Ctrl+C) or SIGTERM
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Request shutdown without an OS signal
    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Setup signal handlers
    pub async fn setup(&self) -> Result<(), std::io::Error> {
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let shutdown = Arc::clone(&self.shutdown);
        let notify = Arc::clone(&self.notify);

        tokio::spawn(async move {
            tokio::select! {
                _ = sigint.recv() => debug!("received SIGINT"),
                _ = sigterm.recv() => debug!("received SIGTERM"),
            }
            shutdown.store(true, Ordering::SeqCst);
            notify.notify_one();
        });

        Ok(())
    }

    /// Wait until shutdown is requested
    pub async fn wait(&self) {
        if self.is_shutdown() {
            return;
        }
        self.notify.notified().await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
