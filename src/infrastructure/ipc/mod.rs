//! IPC transport to the backend process
//!
//! Unix Domain Sockets carrying newline-delimited JSON.

mod socket_path;
mod unix_socket;
pub mod wire;

pub use socket_path::{SocketPath, SOCKET_ENV};
pub use unix_socket::UnixSocketBackend;

use std::io;
use thiserror::Error;

/// Errors establishing the backend connection
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Cannot connect to backend at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: io::Error,
    },
}
