//! Observation snapshots of a game state, serialized as JSON.
//!
//! An [`Observation`] carries everything a viewer can read from a state: the
//! board as rows of `0`/`1`, both piece matrices with their padding, the
//! offsets and every counter.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::{GameState, LockEvent, Piece};
use crate::types::{GameEvent, BOARD_HEIGHT, BOARD_WIDTH};

/// FNV-1a, so hashes are stable across runs.
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Deterministic hash of a whole state, serialized as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl StateHash {
    pub fn of(state: &GameState) -> Self {
        let mut hasher = Fnv1aHasher::new();
        state.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid state hash"))
    }
}

/// Cell matrix of a piece, padding included.
pub type PieceMatrix = Vec<Vec<u8>>;

fn piece_matrix(piece: &Piece) -> PieceMatrix {
    (0..piece.rows())
        .map(|r| (0..piece.cols()).map(|c| piece.get(r, c).as_u8()).collect())
        .collect()
}

/// Outcome of the most recent lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSnapshot {
    pub rows_cleared: u32,
    pub levels_gained: u32,
    pub topped_out: bool,
}

impl From<LockEvent> for LockSnapshot {
    fn from(lock: LockEvent) -> Self {
        Self {
            rows_cleared: lock.rows_cleared,
            levels_gained: lock.levels_gained,
            topped_out: lock.topped_out,
        }
    }
}

/// Read-only view of one game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Transitions applied so far (0 for the initial state)
    pub step: u64,
    /// Event that produced this state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub is_over: bool,
    pub board: [[u8; BOARD_WIDTH]; BOARD_HEIGHT],
    pub current_piece: PieceMatrix,
    pub next_piece: PieceMatrix,
    pub row_offset: i32,
    pub col_offset: i32,
    pub level: u32,
    pub score: u32,
    pub high_score: u32,
    pub rows_cleared_this_level: u32,
    pub total_rows_cleared: u32,
    pub power_ups_left: u32,
    pub debuff_timer: i32,
    pub tick_count: u32,
    pub pieces_locked: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_lock: Option<LockSnapshot>,
    pub state_hash: StateHash,
}

impl Observation {
    pub fn from_state(state: &GameState) -> Self {
        let mut board = [[0u8; BOARD_WIDTH]; BOARD_HEIGHT];
        for (dst, src) in board.iter_mut().zip(state.board().rows()) {
            for (d, cell) in dst.iter_mut().zip(src) {
                *d = cell.as_u8();
            }
        }

        Self {
            step: 0,
            event: None,
            is_over: state.is_over(),
            board,
            current_piece: piece_matrix(state.current_piece()),
            next_piece: piece_matrix(state.next_piece()),
            row_offset: state.row_offset(),
            col_offset: state.col_offset(),
            level: state.level(),
            score: state.score(),
            high_score: state.high_score(),
            rows_cleared_this_level: state.rows_cleared_this_level(),
            total_rows_cleared: state.total_rows_cleared(),
            power_ups_left: state.power_ups_left(),
            debuff_timer: state.debuff_timer(),
            tick_count: state.tick_count(),
            pieces_locked: state.pieces_locked(),
            last_lock: state.last_lock().map(LockSnapshot::from),
            state_hash: StateHash::of(state),
        }
    }

    /// Tag the observation with the transition that produced it.
    pub fn after(mut self, step: u64, event: GameEvent) -> Self {
        self.step = step;
        self.event = Some(event.as_str().to_string());
        self
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
