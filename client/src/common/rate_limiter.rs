use super::errors::ConfigurationError;
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter as GovernorRateLimiter,
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admission algorithm deciding when the next operation may start.
///
/// Implementations only delay; they never reject.
#[async_trait]
pub trait RateLimit: Send + Sync + std::fmt::Debug {
    /// Wait until one more operation may start, and count it as started.
    async fn until_ready(&self);
}

/// Strict rolling-window limiter: at most `rate` starts in any `interval`.
///
/// Keeps the start instants of the last `rate` permits; a new permit is
/// issued once the oldest of them has left the window.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    rate: usize,
    interval: Duration,
    issued: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(rate: NonZeroU32, interval: Duration) -> Self {
        let rate = rate.get() as usize;
        Self {
            rate,
            interval,
            issued: Mutex::new(VecDeque::with_capacity(rate)),
        }
    }

    /// Record a start at `now` if the window allows it, otherwise return how
    /// long to wait before asking again.
    fn try_issue(&self, issued: &mut VecDeque<Instant>, now: Instant) -> Option<Duration> {
        while let Some(oldest) = issued.front() {
            if now.saturating_duration_since(*oldest) >= self.interval {
                issued.pop_front();
            } else {
                break;
            }
        }

        if issued.len() < self.rate {
            issued.push_back(now);
            return None;
        }

        issued
            .front()
            .map(|oldest| self.interval.saturating_sub(now.saturating_duration_since(*oldest)))
    }
}

#[async_trait]
impl RateLimit for SlidingWindowLimiter {
    async fn until_ready(&self) {
        loop {
            let wait = {
                let mut issued = self.issued.lock().await;
                match self.try_issue(&mut issued, Instant::now()) {
                    None => return,
                    Some(wait) => wait,
                }
            };

            log::debug!("Rate limit reached, waiting {wait:?} for the next permit");
            tokio::time::sleep(wait).await;
        }
    }
}

/// Token bucket limiter backed by `governor`'s GCRA implementation.
///
/// The bucket holds a single permit refilled every `interval / rate`
/// (rounded up), so starts are spaced evenly and no rolling `interval` ever
/// sees more than `rate` of them.
pub struct TokenBucketLimiter {
    inner: GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>,
}

impl std::fmt::Debug for TokenBucketLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucketLimiter").finish_non_exhaustive()
    }
}

impl TokenBucketLimiter {
    pub fn new(rate: NonZeroU32, interval: Duration) -> Result<Self, ConfigurationError> {
        // Round up so `rate + 1` starts never fit inside one interval
        let period_nanos = interval.as_nanos().div_ceil(u128::from(rate.get()));
        let period = u64::try_from(period_nanos)
            .map(Duration::from_nanos)
            .map_err(|_| ConfigurationError::InvalidRateLimit {
                reason: format!("interval {interval:?} is too long"),
            })?;
        let quota = Quota::with_period(period).ok_or_else(|| {
            ConfigurationError::InvalidRateLimit {
                reason: format!("replenish period {period:?} must be greater than zero"),
            }
        })?;

        Ok(Self::with_quota(quota))
    }

    /// Create a limiter with a custom quota
    pub fn with_quota(quota: Quota) -> Self {
        Self {
            inner: GovernorRateLimiter::direct(quota),
        }
    }
}

#[async_trait]
impl RateLimit for TokenBucketLimiter {
    async fn until_ready(&self) {
        self.inner.until_ready().await;
    }
}

/// Which admission algorithm a dispatcher uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStrategy {
    #[default]
    SlidingWindow,
    TokenBucket,
}

/// Rate limiter configuration.
///
/// The defaults (18 starts per second, 18 in flight) keep clients safely
/// under the API gateway's hard limit of 100 requests every 5 seconds, with
/// room left for bursty variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Maximum operation starts per interval
    pub rate: u32,
    /// Length of the rolling interval in milliseconds
    pub interval_ms: u64,
    /// Maximum operations executing at once
    pub max_concurrent: usize,
    /// Admission algorithm
    pub strategy: RateLimitStrategy,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            rate: 18,
            interval_ms: 1000,
            max_concurrent: 18,
            strategy: RateLimitStrategy::SlidingWindow,
        }
    }
}

impl RateLimiterConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rate == 0 {
            return Err(ConfigurationError::InvalidRateLimit {
                reason: "rate must be greater than zero".to_string(),
            });
        }
        if self.interval_ms == 0 {
            return Err(ConfigurationError::InvalidRateLimit {
                reason: "interval_ms must be greater than zero".to_string(),
            });
        }
        if self.max_concurrent == 0 {
            return Err(ConfigurationError::InvalidRateLimit {
                reason: "max_concurrent must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Create the configured rate limiter
    pub fn build(&self) -> Result<Box<dyn RateLimit>, ConfigurationError> {
        self.validate()?;
        let rate = NonZeroU32::new(self.rate).ok_or_else(|| ConfigurationError::InvalidRateLimit {
            reason: "rate must be greater than zero".to_string(),
        })?;

        Ok(match self.strategy {
            RateLimitStrategy::SlidingWindow => {
                Box::new(SlidingWindowLimiter::new(rate, self.interval()))
            }
            RateLimitStrategy::TokenBucket => {
                Box::new(TokenBucketLimiter::new(rate, self.interval())?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_sliding_window_issues_up_to_rate() {
        let limiter = SlidingWindowLimiter::new(nz(3), Duration::from_millis(1000));
        let mut issued = VecDeque::new();
        let start = Instant::now();

        assert_none!(limiter.try_issue(&mut issued, start));
        assert_none!(limiter.try_issue(&mut issued, start));
        assert_none!(limiter.try_issue(&mut issued, start + Duration::from_millis(200)));

        let wait = assert_some!(limiter.try_issue(&mut issued, start + Duration::from_millis(400)));
        assert_eq!(wait, Duration::from_millis(600));
    }

    #[test]
    fn test_sliding_window_frees_expired_starts() {
        let limiter = SlidingWindowLimiter::new(nz(2), Duration::from_millis(1000));
        let mut issued = VecDeque::new();
        let start = Instant::now();

        assert_none!(limiter.try_issue(&mut issued, start));
        assert_none!(limiter.try_issue(&mut issued, start + Duration::from_millis(500)));
        assert_some!(limiter.try_issue(&mut issued, start + Duration::from_millis(999)));

        // The first start leaves the window at exactly one interval
        assert_none!(limiter.try_issue(&mut issued, start + Duration::from_millis(1000)));
        let wait = assert_some!(limiter.try_issue(&mut issued, start + Duration::from_millis(1000)));
        assert_eq!(wait, Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sliding_window_waits_for_window() {
        let limiter = SlidingWindowLimiter::new(nz(2), Duration::from_millis(1000));
        let start = Instant::now();

        limiter.until_ready().await;
        limiter.until_ready().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        limiter.until_ready().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_token_bucket_wait() {
        let limiter = assert_ok!(TokenBucketLimiter::new(nz(1), Duration::from_secs(1)));

        limiter.until_ready().await;

        let start = std::time::Instant::now();
        limiter.until_ready().await;
        let elapsed = start.elapsed();

        // Should have waited approximately 1 second
        assert!(elapsed >= Duration::from_millis(900));
        assert!(elapsed <= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_token_bucket_spaces_starts_evenly() {
        let limiter = assert_ok!(TokenBucketLimiter::new(nz(3), Duration::from_millis(300)));

        let start = std::time::Instant::now();
        for _ in 0..3 {
            limiter.until_ready().await;
        }
        // No burst: the third start waits for two refills
        assert!(start.elapsed() >= Duration::from_millis(190));

        limiter.until_ready().await;
        assert!(start.elapsed() >= Duration::from_millis(290));
    }

    #[test]
    fn test_token_bucket_rejects_zero_period() {
        assert_err!(TokenBucketLimiter::new(nz(1), Duration::ZERO));
    }

    #[test]
    fn test_config_defaults() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.rate, 18);
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.max_concurrent, 18);
        assert_eq!(config.strategy, RateLimitStrategy::SlidingWindow);
        assert_ok!(config.validate());
    }

    #[test]
    fn test_config_rejects_zero_values() {
        for config in [
            RateLimiterConfig { rate: 0, ..Default::default() },
            RateLimiterConfig { interval_ms: 0, ..Default::default() },
            RateLimiterConfig { max_concurrent: 0, ..Default::default() },
        ] {
            assert_err!(config.validate());
            assert_err!(config.build());
        }
    }

    #[test]
    fn test_config_deserializes_strategy() {
        let config: RateLimiterConfig = serde_json::from_str(
            r#"{ "rate": 5, "strategy": "token_bucket" }"#,
        )
        .unwrap();

        assert_eq!(config.rate, 5);
        assert_eq!(config.interval_ms, 1000);
        assert_eq!(config.strategy, RateLimitStrategy::TokenBucket);
        assert_ok!(config.build());
    }
}
