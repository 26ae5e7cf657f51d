//! Property tests for the transition function.
//!
//! Random seeds and event sequences; every invariant is checked after every step.

use proptest::prelude::*;

use blockfall::core::{Board, GameState, PieceKind};
use blockfall::types::{GameEvent, BOARD_HEIGHT, BOARD_WIDTH};

fn any_event() -> impl Strategy<Value = GameEvent> {
    prop::sample::select(GameEvent::ALL.to_vec())
}

/// Events that never rotate, so the piece can only reach positions moves allow.
fn shift_or_drop() -> impl Strategy<Value = GameEvent> {
    prop::sample::select(vec![
        GameEvent::MoveLeft,
        GameEvent::MoveRight,
        GameEvent::SoftDrop,
        GameEvent::DescendTick,
    ])
}

fn any_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn assert_step_invariants(prev: &GameState, next: &GameState) {
    assert!(next.score() >= prev.score());
    assert!(next.total_rows_cleared() >= prev.total_rows_cleared());
    assert!(next.high_score() >= prev.high_score());
    assert!(next.high_score() >= next.score());
    assert!(next.level() >= 1);
    assert!(next.rows_cleared_this_level() < 10);
    assert!(next.debuff_timer() > 0);
    assert_eq!(next.board().rows().len(), BOARD_HEIGHT);
}

proptest! {
    #[test]
    fn random_play_keeps_counters_consistent(
        seed in any::<u32>(),
        events in prop::collection::vec(any_event(), 1..400),
    ) {
        let mut state = GameState::new(seed);
        for event in events {
            let next = state.apply(event);
            if event == GameEvent::Restart && state.is_over() {
                prop_assert_eq!(next.high_score(), state.high_score());
                prop_assert_eq!(next.score(), 0);
            } else {
                assert_step_invariants(&state, &next);
            }
            state = next;
        }
    }

    #[test]
    fn shifted_pieces_stay_inside_the_walls(
        seed in any::<u32>(),
        kind in any_kind(),
        events in prop::collection::vec(shift_or_drop(), 1..200),
    ) {
        let mut state = GameState::new(seed).with_pieces(kind.piece(), kind.piece());
        for event in events {
            state = state.apply(event);
            for (_, col) in state.active_cells() {
                prop_assert!((0..BOARD_WIDTH as i32).contains(&col), "column {} out of range", col);
            }
        }
    }

    #[test]
    fn successful_moves_land_inside_the_walls(
        seed in any::<u32>(),
        events in prop::collection::vec(any_event(), 1..300),
    ) {
        let mut state = GameState::new(seed);
        for event in events {
            let next = state.apply(event);
            let shifted = matches!(event, GameEvent::MoveLeft | GameEvent::MoveRight)
                && next.col_offset() != state.col_offset();
            if shifted {
                for (_, col) in next.active_cells() {
                    prop_assert!((0..BOARD_WIDTH as i32).contains(&col));
                }
            }
            state = next;
        }
    }

    #[test]
    fn restart_while_playing_is_identity(
        seed in any::<u32>(),
        events in prop::collection::vec(shift_or_drop(), 0..100),
    ) {
        let mut state = GameState::new(seed);
        for event in events {
            state = state.apply(event);
        }
        prop_assume!(!state.is_over());
        prop_assert_eq!(state.apply(GameEvent::Restart), state);
    }

    #[test]
    fn rotation_is_a_four_cycle(kind in any_kind(), turns in 0usize..12) {
        let start = kind.piece();
        let mut p = start;
        for _ in 0..turns * 4 {
            p = p.rotate();
        }
        prop_assert_eq!(p, start);
    }

    #[test]
    fn clearing_one_full_row_keeps_height(
        row in 0usize..BOARD_HEIGHT,
        noise in prop::collection::vec(any::<bool>(), BOARD_WIDTH * BOARD_HEIGHT),
    ) {
        let mut board = Board::new();
        for (i, filled) in noise.into_iter().enumerate() {
            let (r, c) = (i / BOARD_WIDTH, i % BOARD_WIDTH);
            // Leave column 0 empty everywhere except the chosen row.
            let cell = if r == row { true } else { filled && c != 0 };
            board.set(r as i32, c as i32, cell.into());
        }

        let before = board.filled_count();
        prop_assert_eq!(board.clear_full_rows(), 1);
        prop_assert_eq!(board.rows().len(), BOARD_HEIGHT);
        prop_assert!(!board.row_has_block(0));
        prop_assert!((0..BOARD_HEIGHT).all(|r| !board.is_row_full(r)));
        prop_assert_eq!(board.filled_count(), before - BOARD_WIDTH);
    }
}
