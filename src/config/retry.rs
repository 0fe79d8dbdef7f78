use std::time::Duration;

use serde::Deserialize;

use crate::constants::REQUEST_TIMEOUT_MS;

/// Basic retry policy template
///
/// Constructed fresh per call by merging caller overrides with the
/// client defaults; never shared or mutated after construction.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Single attempt timeout (unit: milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wait strategy between attempts
    #[serde(default)]
    pub backoff: BackoffPolicy,
}

/// Wait strategy between retry attempts
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "policy")]
pub enum BackoffPolicy {
    /// Retry immediately
    #[default]
    No,

    /// Wait a constant period before each retry
    Fixed {
        /// Pause between attempts (unit: milliseconds)
        period_ms: u64,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            timeout_ms: default_timeout_ms(),
            backoff: BackoffPolicy::No,
        }
    }
}

impl RetryPolicy {
    /// Policy identical to `self` but with a different per-attempt
    /// timeout. Used for the discovery (3s) and long-poll (40s) calls.
    pub(crate) fn with_timeout_ms(
        &self,
        timeout_ms: u64,
    ) -> Self {
        Self { timeout_ms, ..*self }
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl BackoffPolicy {
    /// Delay to wait before the given retry (zero-based attempt index
    /// of the attempt about to run).
    pub(crate) fn delay(&self) -> Duration {
        match self {
            BackoffPolicy::No => Duration::ZERO,
            BackoffPolicy::Fixed { period_ms } => Duration::from_millis(*period_ms),
        }
    }
}

fn default_max_attempts() -> usize {
    3
}
fn default_timeout_ms() -> u64 {
    REQUEST_TIMEOUT_MS
}
