//! Event registry adapters

mod local;

pub use local::LocalEventRegistry;
