//! Core types module - shared data structures and constants
//!
//! Everything here is plain data with no dependencies so the engine, the terminal
//! view and the JSON observer all agree on the same vocabulary.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: row 0, column `BOARD_WIDTH / 2 - 1`
//!
//! # Progression Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_LEVEL` | 1 | Level of a fresh game |
//! | `INITIAL_POWER_UPS` | 3 | Clear-last-row charges of a fresh game |
//! | `POWER_UP_ROW_THRESHOLD` | 4 | Rows in one placement that earn a charge |
//! | `DEBUFF_INTERVAL` | 20 | Debuff ticks until a forced level-up |
//! | `LEVEL_UP_ROW_THRESHOLD` | 10 | Rows cleared per level |
//! | `BASE_TICK_THRESHOLD` | 80 | Descend ticks per row at level 1 |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Cell, GameEvent, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let event = GameEvent::from_str("moveLeft").unwrap();
//! assert_eq!(event, GameEvent::MoveLeft);
//! assert_eq!(event.as_str(), "moveLeft");
//!
//! assert!(Cell::Filled.is_filled());
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Row offset of a freshly spawned piece.
pub const SPAWN_ROW: i32 = 0;

/// Column offset of a freshly spawned piece.
pub const SPAWN_COL: i32 = (BOARD_WIDTH / 2) as i32 - 1;

/// Level of a fresh game.
pub const INITIAL_LEVEL: u32 = 1;

/// Power-up charges of a fresh game.
pub const INITIAL_POWER_UPS: u32 = 3;

/// Rows cleared by a single placement that award one power-up charge.
pub const POWER_UP_ROW_THRESHOLD: u32 = 4;

/// Debuff ticks between forced level-ups (also the timer's reset value).
pub const DEBUFF_INTERVAL: i32 = 20;

/// Debuff ticks added per row cleared.
pub const DEBUFF_PER_ROW: i32 = 10;

/// Rows cleared within a level that trigger a level-up.
pub const LEVEL_UP_ROW_THRESHOLD: u32 = 10;

/// Descend ticks per row at level 1. Divided by the level for faster descent.
pub const BASE_TICK_THRESHOLD: u32 = 80;

/// Default period of the descend tick source in milliseconds.
pub const DESCEND_TICK_MS: u64 = 10;

/// Default period of the debuff tick source in milliseconds.
pub const DEBUFF_TICK_MS: u64 = 1000;

/// Largest piece matrix dimension in the catalog.
pub const MAX_PIECE_SIZE: usize = 4;

/// A single board or piece cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// `0` for empty, `1` for filled.
    pub fn as_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled => 1,
        }
    }
}

impl From<bool> for Cell {
    fn from(filled: bool) -> Self {
        if filled {
            Cell::Filled
        } else {
            Cell::Empty
        }
    }
}

/// Discrete inputs consumed by the state engine.
///
/// Timed sources produce `DescendTick` and `DebuffTick`; everything else comes
/// from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// Periodic tick that advances the descend throttle
    DescendTick,
    /// Periodic tick that counts down toward a forced level-up
    DebuffTick,
    /// Shift the piece one column left
    MoveLeft,
    /// Shift the piece one column right
    MoveRight,
    /// Descend one row immediately, ignoring the throttle
    SoftDrop,
    /// Rotate the piece 90° clockwise
    Rotate,
    /// Spend a power-up charge to remove the bottom row
    ClearLastRow,
    /// Start a new game after game over
    Restart,
}

impl GameEvent {
    pub const ALL: [GameEvent; 8] = [
        GameEvent::DescendTick,
        GameEvent::DebuffTick,
        GameEvent::MoveLeft,
        GameEvent::MoveRight,
        GameEvent::SoftDrop,
        GameEvent::Rotate,
        GameEvent::ClearLastRow,
        GameEvent::Restart,
    ];

    /// Parse an event name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameEvent;
    ///
    /// assert_eq!(GameEvent::from_str("softdrop"), Some(GameEvent::SoftDrop));
    /// assert_eq!(GameEvent::from_str("clearLastRow"), Some(GameEvent::ClearLastRow));
    /// assert_eq!(GameEvent::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "descendtick" => Some(GameEvent::DescendTick),
            "debufftick" => Some(GameEvent::DebuffTick),
            "moveleft" => Some(GameEvent::MoveLeft),
            "moveright" => Some(GameEvent::MoveRight),
            "softdrop" => Some(GameEvent::SoftDrop),
            "rotate" => Some(GameEvent::Rotate),
            "clearlastrow" => Some(GameEvent::ClearLastRow),
            "restart" => Some(GameEvent::Restart),
            _ => None,
        }
    }

    /// camelCase name used by scripts and observations
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::DescendTick => "descendTick",
            GameEvent::DebuffTick => "debuffTick",
            GameEvent::MoveLeft => "moveLeft",
            GameEvent::MoveRight => "moveRight",
            GameEvent::SoftDrop => "softDrop",
            GameEvent::Rotate => "rotate",
            GameEvent::ClearLastRow => "clearLastRow",
            GameEvent::Restart => "restart",
        }
    }

    /// Column shift requested by a lateral move, `0` for everything else.
    pub fn column_delta(&self) -> i32 {
        match self {
            GameEvent::MoveLeft => -1,
            GameEvent::MoveRight => 1,
            _ => 0,
        }
    }

    /// Whether the event comes from a periodic timer rather than the player.
    pub fn is_timed(&self) -> bool {
        matches!(self, GameEvent::DescendTick | GameEvent::DebuffTick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_defaults() {
        assert_eq!(INITIAL_LEVEL, 1);
        assert_eq!(INITIAL_POWER_UPS, 3);
        assert_eq!(POWER_UP_ROW_THRESHOLD, 4);
        assert_eq!(DEBUFF_INTERVAL, 20);
        assert_eq!(LEVEL_UP_ROW_THRESHOLD, 10);
        assert_eq!(BASE_TICK_THRESHOLD, 80);
    }

    #[test]
    fn spawn_column_is_left_of_center() {
        assert_eq!(SPAWN_COL, 4);
        assert_eq!(SPAWN_ROW, 0);
    }

    #[test]
    fn event_names_round_trip_case_insensitively() {
        for event in GameEvent::ALL {
            assert_eq!(GameEvent::from_str(event.as_str()), Some(event));
            assert_eq!(
                GameEvent::from_str(&event.as_str().to_uppercase()),
                Some(event)
            );
        }
        assert_eq!(GameEvent::from_str("hardDrop"), None);
    }
}
