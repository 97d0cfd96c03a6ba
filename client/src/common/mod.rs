pub mod dispatcher;
pub mod errors;
pub mod rate_limiter;

pub use dispatcher::{Dispatcher, Schedule, Unlimited};
pub use errors::{ApiError, ConfigurationError};
pub use rate_limiter::{
    RateLimit, RateLimitStrategy, RateLimiterConfig, SlidingWindowLimiter, TokenBucketLimiter,
};
