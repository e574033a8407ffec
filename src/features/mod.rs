//! Optional features built on top of the core hub.

#[cfg(feature = "history")]
mod history;

#[cfg(feature = "history")]
pub use history::{StateHistory, StateVersion};
