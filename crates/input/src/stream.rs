//! Event stream: timers and keyboard merged into one ordered queue.
//!
//! Bridges the sync game loop with async sources. Two interval tasks produce
//! `DescendTick` and `DebuffTick`; a blocking task reads the terminal. All of them
//! push into one unbounded channel that the game loop drains in arrival order,
//! so every transition sees the state left by the previous one.

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::map::{handle_key_event, should_quit};
use crate::types::{GameEvent, DEBUFF_TICK_MS, DESCEND_TICK_MS};

/// How long the key reader waits before re-checking whether the loop is gone.
const KEY_POLL: Duration = Duration::from_millis(50);

/// One item delivered to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A game event to feed into the reducer
    Game(GameEvent),
    /// Terminal resized to `(columns, rows)`
    Resize(u16, u16),
    /// User asked to leave
    Quit,
}

/// Event source settings.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub descend_period: Duration,
    pub debuff_period: Duration,
    /// Read the terminal keyboard (off for headless use)
    pub read_keys: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            descend_period: Duration::from_millis(DESCEND_TICK_MS),
            debuff_period: Duration::from_millis(DEBUFF_TICK_MS),
            read_keys: true,
        }
    }
}

/// Spawn the two timer tasks on `handle`.
///
/// Each task ends once the receiving side of `tx` is dropped.
pub fn spawn_timers(
    handle: &Handle,
    config: &StreamConfig,
    tx: mpsc::UnboundedSender<InputEvent>,
) -> [JoinHandle<()>; 2] {
    [
        handle.spawn(run_timer(config.descend_period, GameEvent::DescendTick, tx.clone())),
        handle.spawn(run_timer(config.debuff_period, GameEvent::DebuffTick, tx)),
    ]
}

async fn run_timer(period: Duration, event: GameEvent, tx: mpsc::UnboundedSender<InputEvent>) {
    let period = period.max(Duration::from_millis(1));
    // First tick after one full period, like a plain repeating timer.
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(event = event.as_str(), ?period, "timer started");
    loop {
        ticker.tick().await;
        if tx.send(InputEvent::Game(event)).is_err() {
            break;
        }
    }
    tracing::debug!(event = event.as_str(), "timer stopped");
}

fn read_keys(tx: mpsc::UnboundedSender<InputEvent>) {
    tracing::debug!("key reader started");
    while !tx.is_closed() {
        let next = match event::poll(KEY_POLL) {
            Ok(true) => event::read().map(Some),
            Ok(false) => Ok(None),
            Err(err) => Err(err),
        };

        let item = match next {
            Ok(Some(Event::Key(key))) if should_quit(key) => Some(InputEvent::Quit),
            Ok(Some(Event::Key(key))) => handle_key_event(key).map(InputEvent::Game),
            Ok(Some(Event::Resize(cols, rows))) => Some(InputEvent::Resize(cols, rows)),
            Ok(_) => None,
            Err(err) => {
                tracing::error!(error = %err, "terminal read failed");
                let _ = tx.send(InputEvent::Quit);
                break;
            }
        };

        if let Some(item) = item {
            if tx.send(item).is_err() {
                break;
            }
        }
    }
    tracing::debug!("key reader stopped");
}

/// Running event sources plus the queue they feed.
pub struct EventStream {
    rt: Option<Runtime>,
    rx: mpsc::UnboundedReceiver<InputEvent>,
}

impl EventStream {
    /// Start the timers (and the key reader when enabled) on a private runtime.
    pub fn start(config: StreamConfig) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("blockfall-events")
            .enable_time()
            .build()
            .context("Failed to create event runtime")?;

        let (tx, rx) = mpsc::unbounded_channel();
        spawn_timers(rt.handle(), &config, tx.clone());
        if config.read_keys {
            rt.spawn_blocking(move || read_keys(tx));
        }

        tracing::info!(
            descend_ms = config.descend_period.as_millis() as u64,
            debuff_ms = config.debuff_period.as_millis() as u64,
            keys = config.read_keys,
            "event stream started"
        );

        Ok(Self { rt: Some(rt), rx })
    }

    /// Block until the next event. `None` once every source has stopped.
    pub fn recv(&mut self) -> Option<InputEvent> {
        self.rx.blocking_recv()
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
        }
        tracing::info!("event stream stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(descend_ms: u64, debuff_ms: u64) -> StreamConfig {
        StreamConfig {
            descend_period: Duration::from_millis(descend_ms),
            debuff_period: Duration::from_millis(debuff_ms),
            read_keys: false,
        }
    }

    #[test]
    fn test_default_periods() {
        let config = StreamConfig::default();
        assert_eq!(config.descend_period, Duration::from_millis(10));
        assert_eq!(config.debuff_period, Duration::from_millis(1000));
        assert!(config.read_keys);
    }

    #[tokio::test]
    async fn test_nothing_before_first_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _tasks = spawn_timers(&Handle::current(), &config(3_600_000, 3_600_000), tx);

        let mut recv = tokio_test::task::spawn(rx.recv());
        tokio_test::assert_pending!(recv.poll());
    }

    #[tokio::test]
    async fn test_timers_interleave_by_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _tasks = spawn_timers(&Handle::current(), &config(2, 25), tx);

        time::sleep(Duration::from_millis(120)).await;

        let mut descend = 0;
        let mut debuff = 0;
        while let Ok(item) = rx.try_recv() {
            match item {
                InputEvent::Game(GameEvent::DescendTick) => descend += 1,
                InputEvent::Game(GameEvent::DebuffTick) => debuff += 1,
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(debuff >= 1, "debuff ticks: {debuff}");
        assert!(descend > debuff, "descend {descend} vs debuff {debuff}");
    }

    #[tokio::test]
    async fn test_timers_stop_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let tasks = spawn_timers(&Handle::current(), &config(1, 1), tx);
        drop(rx);

        for task in tasks {
            let joined = tokio_test::assert_ok!(time::timeout(Duration::from_secs(1), task).await);
            assert!(joined.is_ok());
        }
    }

    #[test]
    fn test_stream_delivers_ticks() {
        let mut stream = EventStream::start(config(1, 1)).unwrap();
        let first = stream.recv();
        assert!(matches!(
            first,
            Some(InputEvent::Game(GameEvent::DescendTick | GameEvent::DebuffTick))
        ));
    }
}
