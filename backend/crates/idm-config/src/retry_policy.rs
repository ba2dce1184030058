//! Read-path retry schedule. Deserialized from `[retry]` and handed to the
//! storage layer unchanged.

use crate::{ConfigError, ConfigErrorResult};

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;

const ATTEMPTS: RangeInclusive<u32> = 1..=10;
const INITIAL_DELAY_MS: RangeInclusive<u64> = 10..=10_000;
const MAX_DELAY_MS: RangeInclusive<u64> = 100..=60_000;
const BACKOFF_MULTIPLIER: RangeInclusive<f64> = 1.0..=10.0;

/// How often a directory read is attempted and how long to wait between
/// attempts. Writes never retry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts in total, the first included
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    /// Cap on any single wait
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Scale each wait by a random factor in [0.5, 1.5)
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Un-jittered wait before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let grown = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);

        Duration::from_millis(grown.min(self.max_delay_ms as f64) as u64)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        within("max_attempts", self.max_attempts, ATTEMPTS)?;
        within("initial_delay_ms", self.initial_delay_ms, INITIAL_DELAY_MS)?;
        within("max_delay_ms", self.max_delay_ms, MAX_DELAY_MS)?;
        within("backoff_multiplier", self.backoff_multiplier, BACKOFF_MULTIPLIER)?;

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(ConfigError::config(format!(
                "retry.initial_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            )));
        }

        Ok(())
    }
}

#[track_caller]
fn within<T>(key: &str, value: T, bounds: RangeInclusive<T>) -> ConfigErrorResult<()>
where
    T: PartialOrd + Display,
{
    if bounds.contains(&value) {
        return Ok(());
    }

    Err(ConfigError::config(format!(
        "retry.{key} must be {}-{}, got {value}",
        bounds.start(),
        bounds.end()
    )))
}
