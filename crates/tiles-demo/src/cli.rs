#![forbid(unsafe_code)]

//! Command-line argument parsing for the autoplay demo.
//!
//! Parses args by hand. Session timing comes from `TILES_*` variables first
//! (see `SessionConfig::from_env`); flags given here override them.

use std::env;
use std::process;
use std::time::Duration;

use tiles_runtime::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
tiles-demo: headless autoplay of the sliding-tile puzzle

USAGE:
    tiles-demo [OPTIONS]

OPTIONS:
    --seed=N          Spawn seed (default: random)
    --tick-ms=N       Milliseconds per animation tick (default: 1)
    --moves=N         Stop after N accepted moves, 0 = play to the end (default: 0)
    --input-ms=N      Pause between autoplay commands (default: 20)
    --no-interrupt    Ignore input while tiles are moving instead of cutting playback short
    --help, -h        Show this help message
    --version, -V     Show version

ENVIRONMENT VARIABLES:
    TILES_SEED, TILES_TICK_MS, TILES_INTERRUPT and the TILES_*_TICKS
    durations configure the session.
    TILES_MOVES       Override --moves default
    TILES_INPUT_MS    Override --input-ms default
    RUST_LOG          Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub seed: Option<u64>,
    /// Tick interval override in milliseconds.
    pub tick_ms: Option<u64>,
    /// Accepted-move limit (0 = unlimited).
    pub moves: u32,
    /// Delay between autoplay commands.
    pub input_ms: u64,
    pub interrupt: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: None,
            moves: 0,
            input_ms: 20,
            interrupt: true,
        }
    }
}

/// What the arguments asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

fn number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}

impl Opts {
    /// Parse the process arguments and environment, exiting on help,
    /// version, or bad input.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        if let Ok(val) = env::var("TILES_MOVES")
            && let Ok(n) = val.parse()
        {
            opts.moves = n;
        }
        if let Ok(val) = env::var("TILES_INPUT_MS")
            && let Ok(n) = val.parse()
        {
            opts.input_ms = n;
        }

        match Self::parse_args(opts, env::args().skip(1)) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("tiles-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Apply `args` on top of `opts`.
    pub fn parse_args(
        mut opts: Self,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Parsed, String> {
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--no-interrupt" => opts.interrupt = false,
                other => {
                    if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(number("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--tick-ms=") {
                        let ms: u64 = number("--tick-ms", val)?;
                        if ms == 0 {
                            return Err("--tick-ms must be at least 1".into());
                        }
                        opts.tick_ms = Some(ms);
                    } else if let Some(val) = other.strip_prefix("--moves=") {
                        opts.moves = number("--moves", val)?;
                    } else if let Some(val) = other.strip_prefix("--input-ms=") {
                        opts.input_ms = number("--input-ms", val)?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }
        Ok(Parsed::Run(opts))
    }

    /// Layer these options over a base configuration.
    #[must_use]
    pub fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ms) = self.tick_ms {
            config = config.with_tick_interval(Duration::from_millis(ms));
        }
        if !self.interrupt {
            config = config.with_interrupt_playback(false);
        }
        config
    }

    #[must_use]
    pub fn input_delay(&self) -> Duration {
        Duration::from_millis(self.input_ms)
    }
}
