//! Headless replay: event scripts in, JSON-lines observations out.
//!
//! Script format, one entry per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! moveLeft
//! softDrop x18     # optional repeat suffix
//! rotate
//! ```

use std::io::Write;

use anyhow::{bail, Context, Result};

use crate::core::GameState;
use crate::observe::Observation;
use crate::types::GameEvent;

/// Largest accepted `xN` repeat count.
pub const MAX_REPEAT: usize = 100_000;

/// Parse an event script into the flat event sequence it describes.
///
/// Errors name the 1-based line number and the offending token.
pub fn parse_script(src: &str) -> Result<Vec<GameEvent>> {
    let mut events = Vec::new();

    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let Some(event) = GameEvent::from_str(name) else {
            bail!("line {line_no}: unknown event `{name}`");
        };

        let count = match tokens.next() {
            None => 1,
            Some(token) => parse_repeat(token)
                .with_context(|| format!("line {line_no}: bad repeat `{token}`"))?,
        };
        if let Some(extra) = tokens.next() {
            bail!("line {line_no}: unexpected token `{extra}`");
        }

        events.extend(std::iter::repeat(event).take(count));
    }

    Ok(events)
}

fn parse_repeat(token: &str) -> Result<usize> {
    let digits = token
        .strip_prefix('x')
        .or_else(|| token.strip_prefix('X'))
        .context("expected `xN`")?;
    let count: usize = digits.parse().context("count is not a number")?;
    if count == 0 || count > MAX_REPEAT {
        bail!("count must be between 1 and {MAX_REPEAT}");
    }
    Ok(count)
}

/// Drive a fresh game seeded with `seed` through `events`.
///
/// Returns one observation per transition, in order.
pub fn replay(seed: u32, events: &[GameEvent]) -> Vec<Observation> {
    let mut state = GameState::new(seed);
    let mut out = Vec::with_capacity(events.len());

    for (i, &event) in events.iter().enumerate() {
        let next = state.apply(event);
        log_transition(&state, &next, event);
        out.push(Observation::from_state(&next).after(i as u64 + 1, event));
        state = next;
    }

    tracing::info!(
        steps = events.len(),
        score = state.score(),
        level = state.level(),
        over = state.is_over(),
        "replay finished"
    );
    out
}

/// Replay and write each observation as one JSON line.
pub fn replay_to_writer<W: Write>(seed: u32, events: &[GameEvent], out: &mut W) -> Result<()> {
    for obs in replay(seed, events) {
        let line = obs.to_json_line().context("Failed to encode observation")?;
        writeln!(out, "{line}").context("Failed to write observation")?;
    }
    out.flush().context("Failed to flush observations")?;
    Ok(())
}

/// Log the notable effects of one transition.
pub fn log_transition(prev: &GameState, next: &GameState, event: GameEvent) {
    if !event.is_timed() {
        tracing::trace!(event = event.as_str(), "input");
    }
    if next.pieces_locked() != prev.pieces_locked() {
        if let Some(lock) = next.last_lock().filter(|l| l.rows_cleared > 0) {
            tracing::debug!(rows = lock.rows_cleared, score = next.score(), "rows cleared");
        }
    }
    if next.level() > prev.level() {
        tracing::info!(level = next.level(), event = event.as_str(), "level up");
    }
    if next.power_ups_left() < prev.power_ups_left() {
        tracing::debug!(left = next.power_ups_left(), "power-up used");
    }
    if next.is_over() && !prev.is_over() {
        tracing::info!(score = next.score(), high_score = next.high_score(), "game over");
    }
    if prev.is_over() && !next.is_over() {
        tracing::info!(high_score = next.high_score(), "restart");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_comments_and_repeats() {
        let script = "# warmup\nmoveLeft\n\nSOFTDROP x3  # down\n  rotate\nclearlastrow\n";
        let events = parse_script(script).unwrap();
        assert_eq!(
            events,
            vec![
                GameEvent::MoveLeft,
                GameEvent::SoftDrop,
                GameEvent::SoftDrop,
                GameEvent::SoftDrop,
                GameEvent::Rotate,
                GameEvent::ClearLastRow,
            ]
        );
    }

    #[test]
    fn test_parse_errors_name_line_and_token() {
        let err = parse_script("moveLeft\nhardDrop\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown event `hardDrop`");

        let err = parse_script("rotate x0").unwrap_err();
        assert!(err.to_string().starts_with("line 1: bad repeat `x0`"));

        let err = parse_script("rotate 3").unwrap_err();
        assert!(format!("{err:#}").contains("expected `xN`"));

        let err = parse_script("rotate x2 now").unwrap_err();
        assert_eq!(err.to_string(), "line 1: unexpected token `now`");
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_replay_one_observation_per_event() {
        let events = parse_script("moveLeft\nsoftDrop x2\ndebuffTick").unwrap();
        let obs = replay(42, &events);
        assert_eq!(obs.len(), 4);
        assert_eq!(obs[0].step, 1);
        assert_eq!(obs[0].event.as_deref(), Some("moveLeft"));
        assert_eq!(obs[0].col_offset, 3);
        assert_eq!(obs[2].row_offset, 2);
        assert_eq!(obs[3].debuff_timer, 19);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = parse_script("softDrop x60\nmoveRight x2\nsoftDrop x40").unwrap();
        assert_eq!(replay(7, &events), replay(7, &events));
    }

    #[test]
    fn test_replay_writes_json_lines() {
        let events = [GameEvent::MoveRight, GameEvent::Rotate];
        let mut out = Vec::new();
        replay_to_writer(3, &events, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let obs: Observation = serde_json::from_str(line).unwrap();
            assert!(obs.event.is_some());
        }
    }
}
