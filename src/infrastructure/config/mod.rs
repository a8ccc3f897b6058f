//! Client configuration adapters

mod xdg;

pub use xdg::XdgClientConfigStore;
