use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorLimiter};
use tokio_util::sync::CancellationToken;

/// Error returned when the context is cancelled while waiting for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limiter wait cancelled")]
pub struct WaitCancelled;

/// Token bucket governing per-request admission across the worker pool.
/// `rate = 0` means unlimited: the limiter is simply absent and `wait`
/// returns immediately.
pub enum RateLimiter {
    Unlimited,
    Limited(GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>),
}

impl RateLimiter {
    pub fn new(rate_per_sec: f64) -> Self {
        if rate_per_sec <= 0.0 {
            return RateLimiter::Unlimited;
        }
        let period = Duration::from_secs_f64(1.0 / rate_per_sec);
        let burst = ((rate_per_sec * 2.0).round() as u32).max(1);
        let quota = Quota::with_period(period)
            .expect("rate period is non-zero")
            .allow_burst(NonZeroU32::new(burst).expect("burst is at least 1"));
        RateLimiter::Limited(GovernorLimiter::direct(quota))
    }

    /// Blocks until a token is available or `ctx` is cancelled.
    pub async fn wait(&self, ctx: &CancellationToken) -> Result<(), WaitCancelled> {
        let limiter = match self {
            RateLimiter::Unlimited => return Ok(()),
            RateLimiter::Limited(limiter) => limiter,
        };
        tokio::select! {
            _ = limiter.until_ready() => Ok(()),
            _ = ctx.cancelled() => Err(WaitCancelled),
        }
    }
}
