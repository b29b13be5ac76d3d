//! Retry policy for request timeouts.

use std::time::Duration;

/// Retry policy applied by the Manager when an exchange times out.
///
/// Only timeouts are retried; socket errors, decode failures, and protocol
/// errors are returned immediately. `max_attempts` counts retries after the
/// initial send, so `max_attempts: 1` means at most two datagrams leave the
/// host.
#[derive(Clone, Debug)]
pub struct Retry {
    /// Maximum number of retry attempts (0 = request sent once).
    pub max_attempts: u32,
    /// Backoff between attempts.
    pub backoff: Backoff,
}

/// Backoff strategy between retry attempts.
#[derive(Clone, Debug, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Fixed delay before each retry.
    Fixed {
        /// Delay before each retry.
        delay: Duration,
    },
    /// Delay doubles after each attempt, capped at `max`.
    Exponential {
        /// Delay before the first retry.
        initial: Duration,
        /// Delay cap.
        max: Duration,
    },
}

impl Default for Retry {
    /// Default: one retry, no delay.
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::None,
        }
    }
}

impl Retry {
    /// No retries. A timeout fails the operation on the first miss.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: Backoff::None,
        }
    }

    /// Fixed delay between retries.
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: attempts,
            backoff: Backoff::Fixed { delay },
        }
    }

    /// Exponential backoff starting at `initial`, capped at `max`.
    pub fn exponential(attempts: u32, initial: Duration, max: Duration) -> Self {
        Self {
            max_attempts: attempts,
            backoff: Backoff::Exponential { initial, max },
        }
    }

    /// Delay to sleep before retry number `attempt` (0-based).
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        match &self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed { delay } => *delay,
            Backoff::Exponential { initial, max } => {
                let shift = attempt.min(31);
                let multiplier = 1u32.checked_shl(shift).unwrap_or(u32::MAX);
                initial.saturating_mul(multiplier).min(*max)
            }
        }
    }
}
