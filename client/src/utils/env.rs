//! Environment variable utilities for safe and validated access.
//!
//! Values are trimmed, and a variable that is set but blank counts as
//! missing.

use thiserror::Error;

/// Errors that can occur when accessing environment variables.
#[derive(Debug, Error)]
pub enum EnvVarError {
    /// Environment variable is not set
    #[error(
        "Environment variable '{name}' not found. Please set this variable in your .env file or environment."
    )]
    NotFound { name: String },

    /// Environment variable contains invalid UTF-8 characters
    #[error(
        "Environment variable '{name}' contains invalid UTF-8 characters. Please check the value."
    )]
    InvalidUtf8 { name: String },

    /// Environment variable is set but contains only whitespace or is empty
    #[error("Environment variable '{name}' is empty. Please provide a valid value.")]
    Empty { name: String },
}

/// Utility functions for safe environment variable handling.
///
/// # Examples
///
/// ```no_run
/// use bizops::utils::env::EnvUtils;
///
/// let api_key = EnvUtils::get_validated_var("BIZ_OPS_API_KEY")?;
/// let host = EnvUtils::get_optional_var("BIZ_OPS_HOST")
///     .unwrap_or_else(|| "https://api.ft.com/biz-ops".to_string());
/// # Ok::<(), bizops::utils::env::EnvVarError>(())
/// ```
pub struct EnvUtils;

impl EnvUtils {
    /// Gets an environment variable, trimmed and checked to be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`EnvVarError`] if the variable is not set, is blank, or is
    /// not valid UTF-8.
    pub fn get_validated_var(name: &str) -> Result<String, EnvVarError> {
        match std::env::var(name) {
            Ok(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Err(EnvVarError::Empty {
                        name: name.to_string(),
                    })
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Err(std::env::VarError::NotPresent) => Err(EnvVarError::NotFound {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(EnvVarError::InvalidUtf8 {
                name: name.to_string(),
            }),
        }
    }

    /// Gets an optional environment variable.
    ///
    /// Missing, blank and non-UTF-8 values all map to `None`.
    pub fn get_optional_var(name: &str) -> Option<String> {
        match Self::get_validated_var(name) {
            Ok(value) => Some(value),
            Err(EnvVarError::NotFound { .. }) => None,
            Err(e) => {
                log::warn!("Ignoring environment variable: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    #[test]
    fn test_missing_variable() {
        let name = "BIZ_OPS_TEST_DEFINITELY_UNSET_VARIABLE";
        assert!(matches!(
            EnvUtils::get_validated_var(name),
            Err(EnvVarError::NotFound { .. })
        ));
        assert_none!(EnvUtils::get_optional_var(name));
    }

    #[test]
    fn test_present_variable_is_trimmed() {
        // PATH is set in every environment the tests run in
        let path = assert_ok!(EnvUtils::get_validated_var("PATH"));
        assert_eq!(path, path.trim());
    }
}
