//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: [`GameView`] paints a
//! [`core::GameState`] into a [`FrameBuffer`] of styled cells and
//! [`TerminalRenderer`] flushes it to the terminal, writing only what changed.
//!
//! Board cells are drawn 2 terminal columns wide to keep them roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_changes, encode_frame, ChangedRuns, Run, TerminalRenderer};
