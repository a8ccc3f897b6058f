//! Recording session domain: states, events and the transition table

pub mod event;
pub mod excerpt;
pub mod state;
pub mod transition;

pub use event::{BackendEvent, EventName, ALL_EVENTS};
pub use excerpt::{error_excerpt, preview_excerpt};
pub use state::AppState;
pub use transition::{transition, Effect, Transition};
