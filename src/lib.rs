//! Open Voice - client side of a voice-to-clipboard transcription tool
//!
//! The backend records audio, transcribes it and pastes the result. This
//! crate keeps a client view of that work in sync: it mirrors the backend's
//! recording session as a state machine, caches the backend configuration,
//! and ships a terminal client built on top.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session states, events, the transition table, value objects and errors
//! - **Application**: Synchronization controller, session store and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (Unix socket backend, in-process events, XDG config)
//! - **CLI**: Command-line interface, argument parsing, logging and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
