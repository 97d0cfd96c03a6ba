use super::app::AppConfig;
use bizops::ConfigurationError;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid chunk_size: {configured} (min: {min_limit}, max: {max_limit})")]
    ChunkSize {
        configured: usize,
        min_limit: usize,
        max_limit: usize,
    },
    #[error("Invalid timeout_ms: {configured} (limit: {limit})")]
    Timeout { configured: u64, limit: u64 },
    #[error(
        "Invalid rate_limit: {rate} requests per {interval_ms}ms exceeds {limit} requests per second"
    )]
    RequestRate {
        rate: u32,
        interval_ms: u64,
        limit: f64,
    },
    #[error("Invalid rate_limit.max_concurrent: {configured} (limit: {limit})")]
    MaxConcurrent { configured: usize, limit: usize },
    #[error(transparent)]
    Client(#[from] ConfigurationError),
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::ChunkSize {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Chunk size out of range!\n\n\
                    Your configured value: {configured}\n\
                    Valid range: {min_limit} - {max_limit}\n\n\
                    Please update client.chunk_size in config.toml to a value between {min_limit} and {max_limit}."
                )
            }
            ConfigValidationError::Timeout { configured, limit } => {
                format!(
                    "Request timeout too high!\n\n\
                    Your configured value: {configured} ms\n\
                    Recommended maximum: {limit} ms\n\n\
                    Please update client.timeout_ms in config.toml."
                )
            }
            ConfigValidationError::RequestRate {
                rate,
                interval_ms,
                limit,
            } => {
                format!(
                    "Request rate too high!\n\n\
                    Your configured rate: {rate} requests every {interval_ms} ms\n\
                    API gateway limit: {limit} requests per second\n\n\
                    Please lower client.rate_limit.rate or raise client.rate_limit.interval_ms in config.toml."
                )
            }
            ConfigValidationError::MaxConcurrent { configured, limit } => {
                format!(
                    "Too many concurrent requests!\n\n\
                    Your configured value: {configured}\n\
                    Recommended maximum: {limit}\n\n\
                    Please update client.rate_limit.max_concurrent in config.toml."
                )
            }
            ConfigValidationError::Client(error) => match error {
                ConfigurationError::MissingApiKey => format!(
                    "{error}!\n\n\
                    Please set client.api_key in config.toml, or the BIZOPS__CLIENT__API_KEY or BIZ_OPS_API_KEY environment variable."
                ),
                ConfigurationError::MissingClientIdentity => format!(
                    "{error}.\n\n\
                    Please set client.system_code or client.user_id in config.toml, or the BIZ_OPS_SYSTEM_CODE or BIZ_OPS_USER_ID environment variable."
                ),
                other => format!("{other}.\n\nPlease check the client section of config.toml."),
            },
        }
    }
}

/// Configuration loading result
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
    ValidationError(Vec<ConfigValidationError>),
}

impl ConfigLoadResult {
    /// Convert into a result, rendering failures as user facing messages
    pub fn into_result(self) -> Result<AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => Err(msg),
            ConfigLoadResult::ValidationError(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
                Err(format!(
                    "Configuration validation failed:\n{}",
                    messages.join("\n\n")
                ))
            }
        }
    }
}
