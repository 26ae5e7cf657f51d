//! Game state module - the immutable game value and its transition function
//!
//! [`GameState::apply`] (and the free [`transition`]) is a pure reducer: it takes the
//! current state by reference and returns the next one. Every invalid or
//! inapplicable event comes back as an unchanged copy; nothing here can fail.
//!
//! Geometry always works on the *trimmed* current piece: its first occupied row
//! sits on `row_offset`, its column 0 on `col_offset`.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::pieces::{random_piece, Piece};
use crate::rng::SimpleRng;
use crate::scoring::{level_up, ClearReward};
use crate::types::*;

/// Outcome of one lock, kept on the state for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LockEvent {
    /// Rows removed by this lock
    pub rows_cleared: u32,
    /// Levels gained from the row-clear carry-over
    pub levels_gained: u32,
    /// Whether this lock ended the game
    pub topped_out: bool,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    row_offset: i32,
    col_offset: i32,
    current_piece: Piece,
    next_piece: Piece,
    is_over: bool,
    level: u32,
    high_score: u32,
    score: u32,
    rows_cleared_this_level: u32,
    total_rows_cleared: u32,
    power_ups_left: u32,
    debuff_timer: i32,
    tick_count: u32,
    tick_threshold: u32,
    /// Most recent lock, replaced on the next one
    last_lock: Option<LockEvent>,
    /// Number of pieces locked this game
    pieces_locked: u32,
    rng: SimpleRng,
}

/// Apply one event to a state, producing the next state.
pub fn transition(state: &GameState, event: GameEvent) -> GameState {
    state.apply(event)
}

impl GameState {
    /// Create the initial state of a game seeded with `seed`
    pub fn new(seed: u32) -> Self {
        Self::from_rng(SimpleRng::new(seed), 0)
    }

    fn from_rng(mut rng: SimpleRng, high_score: u32) -> Self {
        let current_piece = random_piece(&mut rng);
        let next_piece = random_piece(&mut rng);

        Self {
            board: Board::new(),
            row_offset: SPAWN_ROW,
            col_offset: SPAWN_COL,
            current_piece,
            next_piece,
            is_over: false,
            level: INITIAL_LEVEL,
            high_score,
            score: 0,
            rows_cleared_this_level: 0,
            total_rows_cleared: 0,
            power_ups_left: INITIAL_POWER_UPS,
            debuff_timer: DEBUFF_INTERVAL,
            tick_count: 0,
            tick_threshold: BASE_TICK_THRESHOLD,
            last_lock: None,
            pieces_locked: 0,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn row_offset(&self) -> i32 {
        self.row_offset
    }

    pub fn col_offset(&self) -> i32 {
        self.col_offset
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rows_cleared_this_level(&self) -> u32 {
        self.rows_cleared_this_level
    }

    pub fn total_rows_cleared(&self) -> u32 {
        self.total_rows_cleared
    }

    pub fn power_ups_left(&self) -> u32 {
        self.power_ups_left
    }

    pub fn debuff_timer(&self) -> i32 {
        self.debuff_timer
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn tick_threshold(&self) -> u32 {
        self.tick_threshold
    }

    pub fn last_lock(&self) -> Option<LockEvent> {
        self.last_lock
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Seed state of the carried piece generator
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Board coordinates of every filled cell of the trimmed current piece.
    ///
    /// Coordinates may fall outside the board after a rotation near an edge.
    pub fn active_cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let trimmed = self.current_piece.trim();
        let (row0, col0) = (self.row_offset, self.col_offset);
        let cells: ArrayVec<(i32, i32), { MAX_PIECE_SIZE * MAX_PIECE_SIZE }> = trimmed
            .occupied()
            .map(|(r, c)| (row0 + r as i32, col0 + c as i32))
            .collect();
        cells.into_iter()
    }

    /// Descend ticks needed before the next row at the current level.
    pub fn effective_tick_threshold(&self) -> u32 {
        self.tick_threshold / self.level.max(1)
    }

    // Scenario setup. These return modified copies so callers can stage a board
    // or piece and then drive it through `apply`.

    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    pub fn with_pieces(mut self, current: Piece, next: Piece) -> Self {
        self.current_piece = current;
        self.next_piece = next;
        self
    }

    pub fn with_position(mut self, row_offset: i32, col_offset: i32) -> Self {
        self.row_offset = row_offset;
        self.col_offset = col_offset;
        self
    }

    pub fn with_power_ups(mut self, power_ups: u32) -> Self {
        self.power_ups_left = power_ups;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(INITIAL_LEVEL);
        self
    }

    pub fn with_debuff_timer(mut self, debuff_timer: i32) -> Self {
        self.debuff_timer = debuff_timer;
        self
    }

    pub fn with_game_over(mut self, is_over: bool) -> Self {
        self.is_over = is_over;
        self
    }

    /// Apply an event and return the next state.
    ///
    /// While the game is over only `Restart` does anything.
    pub fn apply(&self, event: GameEvent) -> GameState {
        if self.is_over {
            return match event {
                GameEvent::Restart => self.restarted(),
                _ => self.clone(),
            };
        }

        let mut next = self.clone();
        match event {
            GameEvent::DescendTick => next.descend_tick(),
            GameEvent::DebuffTick => next.debuff_tick(),
            GameEvent::MoveLeft | GameEvent::MoveRight => {
                next.try_shift(event.column_delta());
            }
            GameEvent::SoftDrop => next.descend_step(),
            GameEvent::Rotate => next.rotate(),
            GameEvent::ClearLastRow => next.clear_last_row(),
            GameEvent::Restart => {}
        }
        next
    }

    fn descend_tick(&mut self) {
        // Compare tick_count against tick_threshold / level without truncating.
        if u64::from(self.tick_count) * u64::from(self.level)
            >= u64::from(self.tick_threshold)
        {
            self.tick_count = 0;
            self.descend_step();
        } else {
            self.tick_count += 1;
        }
    }

    fn debuff_tick(&mut self) {
        if self.debuff_timer - 1 > 0 {
            self.debuff_timer -= 1;
        } else {
            self.level += 1;
            self.debuff_timer = DEBUFF_INTERVAL;
        }
    }

    /// Move down one row, or lock when resting on the floor or a block.
    fn descend_step(&mut self) {
        if self.is_on_bottom() || self.will_collide_below() {
            self.lock_piece();
        } else {
            self.row_offset += 1;
        }
    }

    fn is_on_bottom(&self) -> bool {
        let height = self.current_piece.trim().rows() as i32;
        self.row_offset + height > BOARD_HEIGHT as i32 - 1
    }

    /// Projected cells outside the board never block.
    fn will_collide_below(&self) -> bool {
        self.active_cells()
            .any(|(row, col)| self.board.is_filled(row + 1, col))
    }

    fn lock_piece(&mut self) {
        for (row, col) in self.active_cells() {
            // Out-of-range targets are skipped.
            self.board.set(row, col, Cell::Filled);
        }

        let levels_before = self.level;
        let rows_cleared = self.resolve_full_rows();

        self.current_piece = self.next_piece;
        self.next_piece = random_piece(&mut self.rng);
        self.row_offset = SPAWN_ROW;
        self.col_offset = SPAWN_COL;
        self.is_over = self.board.row_has_block(0);
        self.pieces_locked += 1;

        self.last_lock = Some(LockEvent {
            rows_cleared,
            levels_gained: self.level - levels_before,
            topped_out: self.is_over,
        });
    }

    /// Remove full rows and apply every counter they earn. Returns rows removed.
    fn resolve_full_rows(&mut self) -> u32 {
        let rows = self.board.clear_full_rows() as u32;
        let reward = ClearReward::for_rows(rows);

        let (levels, remaining) = level_up(self.rows_cleared_this_level + rows);
        self.level += levels;
        self.rows_cleared_this_level = remaining;

        self.score += reward.score;
        self.high_score = self.high_score.max(self.score);
        self.total_rows_cleared += rows;
        self.power_ups_left += reward.power_ups;
        self.debuff_timer += reward.debuff;
        rows
    }

    /// Shift by `delta` columns if the piece stays on the board and hits nothing.
    fn try_shift(&mut self, delta: i32) -> bool {
        if delta == 0 || !self.can_shift(delta) {
            return false;
        }
        self.col_offset += delta;
        true
    }

    /// Whether the trimmed piece can move `delta` columns.
    ///
    /// Only the column boundary is enforced; shifted cells outside the board rows
    /// never collide.
    pub fn can_shift(&self, delta: i32) -> bool {
        let trimmed = self.current_piece.trim();
        let Some((first, last)) = trimmed.column_extent() else {
            return false;
        };

        let target = self.col_offset + delta;
        let (first, last) = (first as i32, last as i32);
        let inside = target + first >= 0 && target + last < BOARD_WIDTH as i32;

        inside
            && !self
                .active_cells()
                .any(|(row, col)| self.board.is_filled(row, col + delta))
    }

    /// Rotate clockwise with the two edge nudges. Placed blocks are not checked.
    fn rotate(&mut self) {
        let before = self.current_piece;
        let rotated = before.rotate();

        let right_nudge = i32::from(
            self.col_offset + rotated.size() as i32 == BOARD_WIDTH as i32 + 1
                && before.column_is_empty(2),
        );
        let left_nudge = i32::from(self.col_offset < 0);

        self.current_piece = rotated;
        self.col_offset = self.col_offset - right_nudge + left_nudge;
    }

    fn clear_last_row(&mut self) {
        if self.power_ups_left == 0 || !self.board.row_has_block(BOARD_HEIGHT - 1) {
            return;
        }
        self.board.drop_bottom_row();
        self.power_ups_left -= 1;
    }

    /// Fresh game continuing the piece generator; only the high score survives.
    fn restarted(&self) -> GameState {
        Self::from_rng(self.rng.clone(), self.high_score)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
