//! Scoring module - progression rules keyed on rows cleared by one placement
//!
//! Clearing rows is the only way to earn score, power-up charges and extra debuff
//! time. Quadratic scoring rewards multi-row clears.

use crate::types::{DEBUFF_PER_ROW, LEVEL_UP_ROW_THRESHOLD, POWER_UP_ROW_THRESHOLD};

/// Score gained by clearing `rows` at once: `rows²`
pub fn score_delta(rows: u32) -> u32 {
    rows * rows
}

/// Debuff ticks added by clearing `rows` at once
pub fn debuff_delta(rows: u32) -> i32 {
    rows as i32 * DEBUFF_PER_ROW
}

/// Power-up charges earned by clearing `rows` at once
pub fn power_up_delta(rows: u32) -> u32 {
    u32::from(rows >= POWER_UP_ROW_THRESHOLD)
}

/// Level carry-over
/// Returns `(levels_gained, rows_left_in_level)`
pub fn level_up(rows_this_level: u32) -> (u32, u32) {
    (
        rows_this_level / LEVEL_UP_ROW_THRESHOLD,
        rows_this_level % LEVEL_UP_ROW_THRESHOLD,
    )
}

/// Every counter change caused by one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearReward {
    pub rows: u32,
    pub score: u32,
    pub power_ups: u32,
    pub debuff: i32,
}

impl ClearReward {
    pub fn for_rows(rows: u32) -> Self {
        Self {
            rows,
            score: score_delta(rows),
            power_ups: power_up_delta(rows),
            debuff: debuff_delta(rows),
        }
    }
}
