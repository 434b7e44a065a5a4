//! Per-process rate limiter for outbound LLM Gateway calls (spec §4.1:
//! the Gateway is the single shared client, so its throughput cap lives
//! here rather than per-agent).

use std::num::NonZeroU32;

use governor::{
    clock::{Clock, QuantaClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};

use tutor_types::error::{TutorError, TutorResult};

pub struct RateLimiter {
    clock: QuantaClock,
    limiter: GovernorRateLimiter<NotKeyed, InMemoryState, QuantaClock>,
}

impl RateLimiter {
    pub fn per_minute(requests_per_minute: u32, burst: u32) -> Self {
        let clock = QuantaClock::default();
        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute.max(1)).unwrap())
            .allow_burst(NonZeroU32::new(burst.max(1)).unwrap());
        let limiter = GovernorRateLimiter::direct_with_clock(quota, &clock);
        Self { clock, limiter }
    }

    /// Returns `Ok(())` if the call may proceed, or a `ProviderQuota` error
    /// carrying the wait time otherwise. Never blocks; the caller decides
    /// whether to retry.
    pub fn check(&self) -> TutorResult<()> {
        self.limiter.check().map_err(|negative| {
            let wait = negative.wait_time_from(self.clock.now());
            TutorError::ProviderQuota(format!("gateway rate limit exceeded, retry in {wait:?}"))
        })
    }
}
