#![forbid(unsafe_code)]

//! Session configuration.
//!
//! Defaults reproduce the classic pacing: one tick per millisecond, 50-tick
//! slides, 100-tick merges and spawns. Every field can be overridden from
//! `TILES_*` environment variables via [`SessionConfig::from_env`]; hosts
//! layer their own flags on top with the `with_*` builders.
//!
//! | field | env |
//! |---|---|
//! | `tick_interval` | `TILES_TICK_MS` |
//! | `slide_ticks` | `TILES_SLIDE_TICKS` |
//! | `merge_ticks` | `TILES_MERGE_TICKS` |
//! | `spawn_ticks` | `TILES_SPAWN_TICKS` |
//! | `score_ticks` | `TILES_SCORE_TICKS` |
//! | `error_ticks` | `TILES_ERROR_TICKS` |
//! | `game_over_ticks` | `TILES_GAME_OVER_TICKS` |
//! | `game_won_ticks` | `TILES_GAME_WON_TICKS` |
//! | `win_value` | `TILES_WIN_VALUE` |
//! | `seed` | `TILES_SEED` |
//! | `interrupt_playback` | `TILES_INTERRUPT` |

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tiles_core::CellValue;

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Field or environment variable name.
    pub key: &'static str,
    /// Offending value as given.
    pub value: String,
    pub reason: &'static str,
}

impl ConfigError {
    fn new(key: &'static str, value: impl fmt::Display, reason: &'static str) -> Self {
        Self {
            key,
            value: value.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} = {:?}: {}", self.key, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Timing and rules for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Wall time between scheduler ticks, honored by the host's clock thread.
    pub tick_interval: Duration,
    /// One movement unit.
    pub slide_ticks: u32,
    /// Two movement units: the incoming slide plus the pop.
    pub merge_ticks: u32,
    pub spawn_ticks: u32,
    pub score_ticks: u32,
    pub error_ticks: u32,
    pub game_over_ticks: u32,
    pub game_won_ticks: u32,
    /// Tile that wins the game.
    pub win_value: CellValue,
    /// Spawn seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Whether a directional command during playback cuts it short (true)
    /// or is ignored (false).
    pub interrupt_playback: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1),
            slide_ticks: 50,
            merge_ticks: 100,
            spawn_ticks: 100,
            score_ticks: 300,
            error_ticks: 300,
            game_over_ticks: 800,
            game_won_ticks: 100,
            win_value: CellValue::V2048,
            seed: None,
            interrupt_playback: true,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::new(key, raw, "not a number"))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::new(key, raw, "expected true or false")),
    }
}

impl SessionConfig {
    /// Defaults overridden by `TILES_*` environment variables, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("TILES_TICK_MS") {
            config.tick_interval = Duration::from_millis(parse("TILES_TICK_MS", &raw)?);
        }
        let ticks: [(&'static str, &mut u32); 7] = [
            ("TILES_SLIDE_TICKS", &mut config.slide_ticks),
            ("TILES_MERGE_TICKS", &mut config.merge_ticks),
            ("TILES_SPAWN_TICKS", &mut config.spawn_ticks),
            ("TILES_SCORE_TICKS", &mut config.score_ticks),
            ("TILES_ERROR_TICKS", &mut config.error_ticks),
            ("TILES_GAME_OVER_TICKS", &mut config.game_over_ticks),
            ("TILES_GAME_WON_TICKS", &mut config.game_won_ticks),
        ];
        for (key, slot) in ticks {
            if let Some(raw) = lookup(key) {
                *slot = parse(key, &raw)?;
            }
        }
        if let Some(raw) = lookup("TILES_WIN_VALUE") {
            let magnitude: u32 = parse("TILES_WIN_VALUE", &raw)?;
            config.win_value = CellValue::try_from(magnitude).map_err(|_| {
                ConfigError::new("TILES_WIN_VALUE", &raw, "not a tile magnitude")
            })?;
        }
        if let Some(raw) = lookup("TILES_SEED") {
            config.seed = Some(parse("TILES_SEED", &raw)?);
        }
        if let Some(raw) = lookup("TILES_INTERRUPT") {
            config.interrupt_playback = parse_bool("TILES_INTERRUPT", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set slide and merge together, keeping merge at two slide units.
    #[must_use]
    pub fn with_unit_ticks(mut self, slide: u32) -> Self {
        self.slide_ticks = slide;
        self.merge_ticks = slide.saturating_mul(2);
        self
    }

    #[must_use]
    pub fn with_spawn_ticks(mut self, ticks: u32) -> Self {
        self.spawn_ticks = ticks;
        self
    }

    /// Set both non-blocking overlays (score pop-up and error flash).
    #[must_use]
    pub fn with_overlay_ticks(mut self, ticks: u32) -> Self {
        self.score_ticks = ticks;
        self.error_ticks = ticks;
        self
    }

    /// Set both terminal overlays.
    #[must_use]
    pub fn with_terminal_ticks(mut self, game_over: u32, game_won: u32) -> Self {
        self.game_over_ticks = game_over;
        self.game_won_ticks = game_won;
        self
    }

    #[must_use]
    pub fn with_win_value(mut self, value: CellValue) -> Self {
        self.win_value = value;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_interrupt_playback(mut self, enabled: bool) -> Self {
        self.interrupt_playback = enabled;
        self
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::new(
                "tick_interval",
                format!("{:?}", self.tick_interval),
                "must be positive",
            ));
        }
        let durations = [
            ("slide_ticks", self.slide_ticks),
            ("merge_ticks", self.merge_ticks),
            ("spawn_ticks", self.spawn_ticks),
            ("score_ticks", self.score_ticks),
            ("error_ticks", self.error_ticks),
            ("game_over_ticks", self.game_over_ticks),
            ("game_won_ticks", self.game_won_ticks),
        ];
        for (key, ticks) in durations {
            if ticks == 0 {
                return Err(ConfigError::new(key, ticks, "must be at least one tick"));
            }
        }
        if self.win_value <= CellValue::V2 {
            return Err(ConfigError::new(
                "win_value",
                self.win_value.magnitude(),
                "must exceed the smallest spawned tile",
            ));
        }
        Ok(())
    }
}
