//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds every game rule. It has **no dependencies** on the terminal,
//! timers, or I/O:
//!
//! - **Deterministic**: the piece generator lives inside the state, so the same
//!   seed and the same event sequence always produce the same game
//! - **Pure**: [`GameState::apply`] returns a new state and never mutates its input
//! - **Total**: events that cannot apply return an unchanged copy; nothing fails
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of locked cells, row clearing
//! - [`game_state`]: the state value and its transition function
//! - [`pieces`]: piece catalog, trimming, clockwise rotation
//! - [`rng`]: seeded LCG for uniform piece selection
//! - [`scoring`]: score, power-up, debuff and level rewards per clear
//!
//! # Game Rules
//!
//! - **Gravity**: a `DescendTick` arrives every 10 ms; the piece drops one row
//!   once `80 / level` ticks have been counted
//! - **Debuff**: a `DebuffTick` arrives every second; when the timer runs out the
//!   level rises by one and the timer resets to 20
//! - **Scoring**: clearing `n` rows at once scores `n²` and adds `10 * n` to the
//!   debuff timer; four or more rows earn a power-up charge
//! - **Power-up**: `ClearLastRow` spends a charge to drop the bottom row, with no
//!   score or row credit
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameEvent;
//!
//! let game = GameState::new(12345);
//! let moved = game.apply(GameEvent::MoveLeft);
//!
//! assert_eq!(moved.col_offset(), game.col_offset() - 1);
//! // The original value is untouched.
//! assert_eq!(game.col_offset(), 4);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{transition, GameState, LockEvent};
pub use pieces::{random_piece, Piece, PieceKind};
pub use rng::SimpleRng;
pub use scoring::ClearReward;
