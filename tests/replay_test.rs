//! Headless replay through the facade crate

use serde::Deserialize;

use blockfall::adapter::{parse_script, replay, replay_to_writer, Observation};
use blockfall::types::GameEvent;

/// The subset of an observation line an external reader would consume.
#[derive(Debug, Deserialize)]
struct Line {
    step: u64,
    event: String,
    score: u32,
    level: u32,
    is_over: bool,
    board: Vec<Vec<u8>>,
}

const SCRIPT: &str = "\
# drop the first piece to the floor
softDrop x25
moveLeft x5
softDrop x25
debuffTick x3
clearLastRow
";

#[test]
fn replay_script_to_json_lines() {
    let events = parse_script(SCRIPT).unwrap();
    assert_eq!(events.len(), 25 + 5 + 25 + 3 + 1);

    let mut out = Vec::new();
    replay_to_writer(77, &events, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let lines: Vec<Line> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), events.len());
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.step, i as u64 + 1);
        assert_eq!(line.board.len(), 20);
        assert!(line.board.iter().all(|row| row.len() == 10));
        assert!(line.level >= 1);
        assert!(!line.is_over);
        assert_eq!(line.score, 0);
    }
    assert_eq!(lines[0].event, "softDrop");
    assert_eq!(lines.last().map(|l| l.event.as_str()), Some("clearLastRow"));
}

#[test]
fn replay_locks_pieces_and_spends_power_up() {
    let events = parse_script(SCRIPT).unwrap();
    let obs = replay(77, &events);

    let last: &Observation = obs.last().unwrap();
    assert!(last.pieces_locked >= 2);
    // One charge spent on the bottom row.
    assert_eq!(last.power_ups_left, 2);
    assert_eq!(last.debuff_timer, 17);
}

#[test]
fn same_seed_same_observations() {
    let events = vec![GameEvent::SoftDrop; 200];
    let a = replay(5, &events);
    let b = replay(5, &events);
    assert_eq!(a, b);

    let c = replay(6, &events);
    assert_ne!(
        a.iter().map(|o| o.state_hash).collect::<Vec<_>>(),
        c.iter().map(|o| o.state_hash).collect::<Vec<_>>()
    );
}

#[test]
fn bad_script_reports_line() {
    let err = parse_script("softDrop\nmoveUp x2\n").unwrap_err();
    assert!(err.to_string().contains("line 2"));
    assert!(err.to_string().contains("moveUp"));
}
