//! Blockfall terminal runner (default binary).
//!
//! Interactive mode owns the terminal: crossterm raw mode plus the
//! framebuffer renderer, fed by the merged timer/keyboard event stream.
//! `--replay` runs headless and prints one JSON observation per event.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use blockfall::adapter::replay::{log_transition, parse_script, replay_to_writer};
use blockfall::core::GameState;
use blockfall::input::{EventStream, InputEvent, StreamConfig};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{DEBUFF_TICK_MS, DESCEND_TICK_MS};

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about = "Falling-block puzzle game for the terminal")]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v = DEBUG, -vv = TRACE)")]
    verbose: u8,

    #[arg(long, env = "BLOCKFALL_SEED", help = "Seed for piece selection (default: clock-derived, 0 in replay mode)")]
    seed: Option<u32>,

    #[arg(long, env = "BLOCKFALL_TICK_MS", default_value_t = DESCEND_TICK_MS, help = "Descend tick period in milliseconds")]
    tick_ms: u64,

    #[arg(long, env = "BLOCKFALL_DEBUFF_MS", default_value_t = DEBUFF_TICK_MS, help = "Debuff tick period in milliseconds")]
    debuff_ms: u64,

    #[arg(long, env = "BLOCKFALL_LOG_FILE", help = "Write logs to this file")]
    log_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH|-", help = "Replay an event script headless and print JSON observations")]
    replay: Option<String>,
}

impl Cli {
    fn seed(&self) -> u32 {
        if self.replay.is_some() {
            return self.seed.unwrap_or(0);
        }
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }

    fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            descend_period: Duration::from_millis(self.tick_ms),
            debuff_period: Duration::from_millis(self.debuff_ms),
            read_keys: true,
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // The interactive game owns the terminal, so it only logs to a file.
    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = (cli.log_file.is_none() && cli.replay.is_some()).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(level)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let seed = cli.seed();
    info!(seed, tick_ms = cli.tick_ms, debuff_ms = cli.debuff_ms, "starting");

    if let Some(source) = &cli.replay {
        return run_replay(seed, source);
    }

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|()| run(&mut term, seed, cli.stream_config()));

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting with error");
    }
    result
}

fn run_replay(seed: u32, source: &str) -> Result<()> {
    let script = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read script {source}"))?
    };

    let events = parse_script(&script).with_context(|| format!("Invalid script {source}"))?;
    info!(events = events.len(), "replaying script");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay_to_writer(seed, &events, &mut out)
}

fn run(term: &mut TerminalRenderer, seed: u32, config: StreamConfig) -> Result<()> {
    let mut state = GameState::new(seed);
    let view = GameView::default();

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut viewport = Viewport::new(w, h);
    let mut fb = FrameBuffer::new(w, h);
    view.render_into(&state, viewport, &mut fb);
    term.present(&mut fb)?;

    let mut stream = EventStream::start(config)?;

    while let Some(first) = stream.recv() {
        let mut dirty = false;
        let mut item = Some(first);

        // Apply everything already queued before drawing once.
        while let Some(input) = item {
            match input {
                InputEvent::Quit => {
                    info!(score = state.score(), high_score = state.high_score(), "quit");
                    return Ok(());
                }
                InputEvent::Resize(w, h) => {
                    viewport = Viewport::new(w, h);
                    term.invalidate();
                    dirty = true;
                }
                InputEvent::Game(event) => {
                    let next = state.apply(event);
                    if next != state {
                        log_transition(&state, &next, event);
                        state = next;
                        dirty = true;
                    }
                }
            }
            item = stream.try_recv();
        }

        if dirty {
            view.render_into(&state, viewport, &mut fb);
            term.present(&mut fb)?;
        }
    }

    Ok(())
}
