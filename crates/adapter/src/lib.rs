//! Adapter module - headless observers of the game
//!
//! This crate turns game states into serializable [`Observation`]s and drives
//! recorded event scripts through the engine without a terminal.
//!
//! # Observation
//!
//! One JSON object per state, carrying the board as rows of `0`/`1`, the current
//! and next piece matrices, both offsets, every counter, the most recent lock
//! outcome and a deterministic `state_hash`.
//!
//! ```text
//! {"step":1,"event":"moveLeft","is_over":false,"board":[[0,0,...],...],
//!  "current_piece":[[0,1,0],[1,1,0],[0,1,0]],"row_offset":0,"col_offset":3,...}
//! ```
//!
//! # Replay
//!
//! [`replay::parse_script`] reads one event name per line (`#` comments, optional
//! `xN` repeat suffix). [`replay::replay`] applies the events to a seeded game and
//! returns one observation per transition; the same seed and script always give
//! the same output.

pub mod observe;
pub mod replay;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use observe::{LockSnapshot, Observation, StateHash};
pub use replay::{parse_script, replay, replay_to_writer};
