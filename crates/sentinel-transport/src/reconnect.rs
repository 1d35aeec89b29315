//! Supervised retry policy for lost connections.
//!
//! Disabled by default: a failed or closed session stays closed and the
//! presenter falls back to idle. When enabled, the transport retries with
//! exponential backoff before giving up.

use std::time::Duration;

/// Default initial reconnection backoff duration.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Default maximum reconnection backoff duration (cap).
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Default number of consecutive reconnection attempts before giving up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// How a transport reacts to losing its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ReconnectPolicy {
    /// Never retry: `Closed` is final.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_attempts: MAX_RECONNECT_ATTEMPTS,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }

    /// Retry with the default backoff schedule.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::disabled()
        }
    }

    /// Whether another attempt numbered `attempt` (1-based) is allowed.
    pub fn allows(&self, attempt: u32) -> bool {
        self.enabled && attempt <= self.max_attempts
    }

    /// Compute exponential backoff duration for reconnection attempt `n`.
    ///
    /// The formula is `initial_backoff * 2^(n-1)`, capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        // checked_shl returns None if the shift amount >= 32
        let exponent = attempt.saturating_sub(1);
        let multiplier = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(multiplier)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}
