use super::LoggingConfig;
use super::limits::{
    GATEWAY_MAX_REQUESTS_PER_SECOND, MAX_CHUNK_SIZE, MAX_CONCURRENT_REQUESTS, MAX_TIMEOUT_MS,
    MIN_CHUNK_SIZE,
};
use super::validation::ConfigValidationError;
use bizops::ClientOptions;
use bizops::client::DEFAULT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    client: ClientOptions,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    pub fn new(client: ClientOptions, logging: LoggingConfig) -> Self {
        Self { client, logging }
    }

    /// Client options as configured, without environment fallbacks
    pub fn client(&self) -> &ClientOptions {
        &self.client
    }

    /// Client options with unset credentials filled from `BIZ_OPS_*`
    /// environment variables
    pub fn client_options(&self) -> ClientOptions {
        self.client.clone().with_env_fallback()
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Copy of the configuration safe to print
    pub fn redacted(&self) -> AppConfig {
        let mut config = self.clone();
        if config.client.api_key.is_some() {
            config.client.api_key = Some("********".to_string());
        }
        config
    }

    /// Validate the configuration against defined limits.
    ///
    /// Credentials are not checked here; commands that talk to the API
    /// check them when the client is built.
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let chunk_size = self.client.batch.chunk_size();
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            errors.push(ConfigValidationError::ChunkSize {
                configured: chunk_size,
                min_limit: MIN_CHUNK_SIZE,
                max_limit: MAX_CHUNK_SIZE,
            });
        }

        let timeout_ms = self.client.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms > MAX_TIMEOUT_MS {
            errors.push(ConfigValidationError::Timeout {
                configured: timeout_ms,
                limit: MAX_TIMEOUT_MS,
            });
        }

        let rate_limit = &self.client.rate_limit;
        if let Err(e) = rate_limit.validate() {
            errors.push(e.into());
        } else {
            let per_second = f64::from(rate_limit.rate) * 1000.0 / rate_limit.interval_ms as f64;
            if per_second > GATEWAY_MAX_REQUESTS_PER_SECOND {
                errors.push(ConfigValidationError::RequestRate {
                    rate: rate_limit.rate,
                    interval_ms: rate_limit.interval_ms,
                    limit: GATEWAY_MAX_REQUESTS_PER_SECOND,
                });
            }
        }

        if rate_limit.max_concurrent > MAX_CONCURRENT_REQUESTS {
            errors.push(ConfigValidationError::MaxConcurrent {
                configured: rate_limit.max_concurrent,
                limit: MAX_CONCURRENT_REQUESTS,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
