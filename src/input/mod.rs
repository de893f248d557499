//! Input handling
//!
//! Action-based keyboard/mouse input with configurable key bindings and
//! explicit per-frame state (no globals).

mod actions;
mod bindings;
mod state;

pub use actions::{Action, ActionSet};
pub use bindings::KeyBindings;
pub use state::{Button, InputSample, InputState};
