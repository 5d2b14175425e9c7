//! Retry policy and the sleep seam used between provisioning attempts.

use std::ops::Range;
use std::time::Duration;

use async_trait::async_trait;
use tenantctl_config::{BackoffStrategy, ProvisioningSettings};

/// Delay applied before an attempt, as a function of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// No delay at all.
    None,
    /// `attempt * step`; attempt 0 waits zero.
    Linear {
        /// Increment per attempt.
        step: Duration,
    },
    /// `initial * 2^(attempt - 1)` capped at `max`; attempt 0 waits zero.
    Exponential {
        /// Delay before attempt 1.
        initial: Duration,
        /// Ceiling for any single delay.
        max: Duration,
    },
}

impl Backoff {
    /// Delay before the attempt with index `attempt`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Linear { step } => step.saturating_mul(attempt),
            Self::Exponential { initial, max } => {
                if attempt == 0 {
                    return Duration::ZERO;
                }
                2_u32
                    .checked_pow(attempt - 1)
                    .and_then(|factor| initial.checked_mul(factor))
                    .map_or(max, |delay| delay.min(max))
            }
        }
    }
}

/// Bounded attempt count plus backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            5,
            Backoff::Linear {
                step: Duration::from_secs(1),
            },
        )
    }
}

impl RetryPolicy {
    /// A policy making at most `max_attempts` attempts (at least one).
    #[must_use]
    pub const fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            backoff,
        }
    }

    /// Build the policy described by the provisioning settings.
    #[must_use]
    pub const fn from_settings(settings: &ProvisioningSettings) -> Self {
        let backoff = match settings.backoff {
            BackoffStrategy::Linear => Backoff::Linear {
                step: settings.backoff_step(),
            },
            BackoffStrategy::Exponential => Backoff::Exponential {
                initial: settings.backoff_step(),
                max: settings.max_backoff(),
            },
        };
        Self::new(settings.max_attempts, backoff)
    }

    /// Total attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff in use.
    #[must_use]
    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Attempt indices, `0..max_attempts`.
    #[must_use]
    pub const fn attempts(&self) -> Range<u32> {
        0..self.max_attempts
    }

    /// Delay to wait before the attempt with index `attempt`.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Cooperative delay between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
