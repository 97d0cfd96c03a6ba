use super::errors::ConfigurationError;
use super::rate_limiter::{RateLimit, RateLimiterConfig};
use std::future::Future;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};

/// Bounded-rate admission control.
///
/// `schedule` delays `operation` until it may start, runs it exactly once
/// and hands back its output unchanged. Admission never fails; errors only
/// come from the operation itself.
pub trait Schedule: Send + Sync {
    fn schedule<F, Fut, T>(&self, operation: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send;
}

/// Rate- and concurrency-limited dispatcher shared by every request a
/// client makes.
///
/// Callers are admitted strictly in arrival order: an admission lock (FIFO
/// fair) is held while a caller waits for a concurrency slot and then for a
/// rate permit, so a later caller can never overtake an earlier one. The
/// concurrency slot is held until the operation settles, or until its future
/// is dropped.
///
/// # Examples
///
/// ```no_run
/// use bizops::common::{Dispatcher, RateLimiterConfig, Schedule};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatcher = Dispatcher::new(&RateLimiterConfig::default())?;
///
/// let answer = dispatcher.schedule(|| async { 42 }).await;
/// assert_eq!(answer, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    limiter: Box<dyn RateLimit>,
    slots: Semaphore,
    admission: Mutex<()>,
    max_concurrent: usize,
}

impl Dispatcher {
    /// Create a dispatcher from configuration
    pub fn new(config: &RateLimiterConfig) -> Result<Self, ConfigurationError> {
        let limiter = config.build()?;
        Self::with_limiter(limiter, config.max_concurrent)
    }

    /// Create a dispatcher around a custom rate limiting algorithm
    pub fn with_limiter(
        limiter: Box<dyn RateLimit>,
        max_concurrent: usize,
    ) -> Result<Self, ConfigurationError> {
        if max_concurrent == 0 {
            return Err(ConfigurationError::InvalidRateLimit {
                reason: "max_concurrent must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            limiter,
            slots: Semaphore::new(max_concurrent),
            admission: Mutex::new(()),
            max_concurrent,
        })
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Number of scheduled operations currently executing
    pub fn in_flight(&self) -> usize {
        self.max_concurrent
            .saturating_sub(self.slots.available_permits())
    }

    async fn admit(&self) -> Option<SemaphorePermit<'_>> {
        let _turn = self.admission.lock().await;

        let slot = match self.slots.acquire().await {
            Ok(slot) => Some(slot),
            Err(e) => {
                log::warn!("Concurrency limit unavailable, running unbounded: {e}");
                None
            }
        };
        self.limiter.until_ready().await;

        log::debug!(
            "Permit granted ({} of {} slots in use)",
            self.in_flight(),
            self.max_concurrent
        );
        slot
    }
}

impl Schedule for Dispatcher {
    fn schedule<F, Fut, T>(&self, operation: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        async move {
            let _slot = self.admit().await;
            operation().await
        }
    }
}

/// Pass-through scheduler applying no limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl Schedule for Unlimited {
    fn schedule<F, Fut, T>(&self, operation: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        operation()
    }
}
