#![forbid(unsafe_code)]

//! Headless autoplay host.
//!
//! Runs one game with a clock thread ticking the session and the main thread
//! feeding directional commands, then prints the final board.

mod cli;
mod ticker;

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tiles_runtime::{Command, CommandOutcome, Phase, Session, SessionConfig};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Opts;
use crate::ticker::Ticker;

/// Tried in order until one changes the board.
const PREFERENCE: [Command; 4] = [Command::Down, Command::Left, Command::Right, Command::Up];

/// Upper bound on waiting for the last overlay to finish.
const DRAIN_LIMIT: Duration = Duration::from_secs(5);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// Play until the game ends or the move limit is reached. Returns accepted
/// moves.
fn autoplay(session: &Session, opts: &Opts) -> u32 {
    let mut accepted = 0;
    loop {
        if session.is_over() {
            break;
        }
        if opts.moves > 0 && accepted >= opts.moves {
            break;
        }
        if session.phase() == Phase::Won && session.dismiss_win() {
            info!(score = session.score(), "continuing past the win");
        }

        for command in PREFERENCE {
            match session.handle(command) {
                CommandOutcome::Moved { .. } => {
                    accepted += 1;
                    break;
                }
                CommandOutcome::Unchanged => continue,
                _ => break,
            }
        }
        thread::sleep(opts.input_delay());
    }
    accepted
}

fn wait_for_playback(session: &Session, poll: Duration) {
    let deadline = Instant::now() + DRAIN_LIMIT;
    while session.is_animating() {
        if Instant::now() >= deadline {
            warn!("playback did not settle, cutting it short");
            session.handle(Command::Cancel);
            break;
        }
        thread::sleep(poll);
    }
}

fn main() -> ExitCode {
    init_tracing();
    let opts = Opts::parse();

    let config = match SessionConfig::from_env() {
        Ok(base) => opts.apply(base),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let session = match Session::new(config.clone()) {
        Ok(session) => Arc::new(session),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        seed = ?config.seed,
        tick = ?config.tick_interval,
        interrupt = config.interrupt_playback,
        "starting autoplay"
    );

    let clock = {
        let session = Arc::clone(&session);
        Ticker::start(config.tick_interval, move || session.tick())
    };
    if !clock.is_running() {
        eprintln!("could not start the clock thread");
        return ExitCode::FAILURE;
    }

    let accepted = autoplay(&session, &opts);
    wait_for_playback(&session, config.tick_interval);
    let ticks = clock.stop();
    info!(accepted, ticks, "autoplay finished");

    let snap = session.snapshot();
    println!("{}", session.board());
    println!();
    println!(
        "{:<10} score {}  best {}  moves {}  max {}  time {:.2?}",
        snap.phase,
        snap.score,
        snap.best,
        snap.moves,
        session.board().max_tile(),
        snap.elapsed,
    );
    ExitCode::SUCCESS
}
