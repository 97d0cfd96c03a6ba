//! Limits applied to configuration values before a client is built.

/// Smallest number of records per batch request
pub const MIN_CHUNK_SIZE: usize = 1;

/// Largest number of records per batch request
pub const MAX_CHUNK_SIZE: usize = 5000;

/// Maximum reasonable request timeout (2 minutes)
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// API gateway hard limit: 100 requests every 5 seconds
pub const GATEWAY_MAX_REQUESTS_PER_SECOND: f64 = 20.0;

/// Maximum reasonable number of requests in flight
pub const MAX_CONCURRENT_REQUESTS: usize = 100;
