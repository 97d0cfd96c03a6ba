use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod app;
pub mod limits;
pub mod validation;

pub use app::AppConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of environment variables overriding configuration values, e.g.
/// `BIZOPS__CLIENT__API_KEY` or `BIZOPS__CLIENT__RATE_LIMIT__RATE`.
pub const ENV_PREFIX: &str = "BIZOPS";

/// Environment source used for configuration overrides.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Per-user configuration file, e.g. `~/.config/bizops/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bizops").join(CONFIG_FILE_NAME))
}

/// Load configuration from `.env`, configuration files and the environment.
///
/// Without an explicit `path`, the per-user file and `./config.toml` are both
/// optional, the latter overriding the former. An explicit `path` must
/// exist. Environment variables override file values.
pub fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    load_config_from(path, environment())
}

/// Load configuration with a custom environment source.
pub fn load_config_from(path: Option<&Path>, env_source: Environment) -> ConfigLoadResult {
    let mut builder = Config::builder();

    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        None => {
            if let Some(user_path) = user_config_path() {
                builder = builder.add_source(
                    File::from(user_path)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
            builder = builder.add_source(
                File::with_name(CONFIG_FILE_NAME)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
    }

    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => match app_config.validate() {
            Ok(()) => ConfigLoadResult::Success(Box::new(app_config)),
            Err(errors) => ConfigLoadResult::ValidationError(errors),
        },
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn new(level: Option<String>, file: Option<String>) -> Self {
        Self { level, file }
    }

    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
