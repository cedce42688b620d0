//! Tracker configuration
//!
//! # Environment Variables
//!
//! - `BT_INITIAL_CAPACITY=<n>` - initial heap capacity (default 16)
//! - `BT_SEED=<list>` - seed list, e.g. `A:9,B:2,C:5` (see `seed` module);
//!   set to an empty string for an unseeded tracker
//! - `BT_DEBUG=1` - raise the log level to debug when a tracker is built

use std::str::FromStr;

use crate::bug::Bug;
use crate::constants::{DEFAULT_CAPACITY, MAX_INITIAL_CAPACITY};
use crate::error::{TrackerError, TrackerResult};
use crate::seed::{default_seed, parse_seed, SeedBug};

/// Get environment variable parsed as type T, or return default
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Get environment variable as optional value
///
/// `None` if unset or unparsable.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| parse_value(&v))
}

/// Get environment variable as boolean
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true; any other
/// value is false. Unset returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => parse_flag(&val),
        Err(_) => default,
    }
}

fn parse_value<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Configuration for a tracker
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Heap slots reserved up front
    pub initial_capacity: usize,

    /// Bugs inserted at construction, in order
    pub seed: Vec<SeedBug>,

    /// Raise log level to debug on construction
    pub debug_logging: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            seed: default_seed(),
            debug_logging: false,
        }
    }
}

impl TrackerConfig {
    /// Default configuration (seeded with `default_seed()`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration overridden by `BT_*` environment variables
    pub fn from_env() -> TrackerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration overridden by whatever `lookup` returns for
    /// each `BT_*` key
    ///
    /// Same rules as `from_env`: an unparsable capacity keeps the default,
    /// a malformed seed list is an error.
    pub fn from_lookup<F>(lookup: F) -> TrackerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(n) = lookup("BT_INITIAL_CAPACITY").and_then(|v| parse_value(&v)) {
            config.initial_capacity = n;
        }
        if let Some(list) = lookup("BT_SEED") {
            config.seed = parse_seed(&list)?;
        }
        if let Some(flag) = lookup("BT_DEBUG") {
            config.debug_logging = parse_flag(&flag);
        }
        Ok(config)
    }

    /// Set initial heap capacity
    pub fn initial_capacity(mut self, n: usize) -> Self {
        self.initial_capacity = n;
        self
    }

    /// Replace the seed list
    pub fn seed(mut self, seed: Vec<SeedBug>) -> Self {
        self.seed = seed;
        self
    }

    /// Start with no bugs
    pub fn unseeded(mut self) -> Self {
        self.seed.clear();
        self
    }

    /// Enable debug logging
    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> TrackerResult<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(TrackerError::InvalidConfig(
                "initial_capacity exceeds maximum",
            ));
        }
        if let Some(bad) = self.seed.iter().find(|s| !Bug::is_valid_id(&s.id)) {
            return Err(TrackerError::InvalidId(bad.id.clone()));
        }
        Ok(())
    }
}
