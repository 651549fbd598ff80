use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Builds a limiter allowing `requests_per_minute` calls (at least one).
pub fn per_minute(requests_per_minute: u32) -> Limiter {
    let rate = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_minute(rate)))
}

/// Blocks the current thread until the limiter admits one more request.
pub fn wait(limiter: &Limiter) {
    let clock = DefaultClock::default();
    while let Err(not_until) = limiter.check() {
        let delay = not_until.wait_time_from(clock.now());
        log::debug!("Rate limited, sleeping {:?}", delay);
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_admitted_immediately() {
        let limiter = per_minute(60);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn zero_rate_is_clamped_to_one() {
        let limiter = per_minute(0);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
