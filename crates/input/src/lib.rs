//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameEvent`] and merges them with
//! the two game timers into one ordered [`EventStream`].

pub mod map;
pub mod stream;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
pub use stream::{spawn_timers, EventStream, InputEvent, StreamConfig};
