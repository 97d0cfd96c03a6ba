//! Types and data structures for batch operations.
//!
//! This module defines the error entries collected from failed chunks, the
//! batch configuration and the configuration error raised before any work
//! starts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of records sent per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// One structured error entry reported by the API for a failed chunk.
///
/// Biz Ops answers a rejected batch with a body such as
/// `{"errors": [{"message": "...", "details": {...}}]}`. Each element of that
/// list becomes one `SubError` so callers can see every rejected record
/// rather than a single collapsed message.
///
/// # Examples
///
/// ```no_run
/// use bizops::batch::SubError;
/// use serde_json::json;
///
/// let error = SubError::new("Invalid property")
///     .with_details(json!({ "messages": ["name must be a string"] }));
/// assert_eq!(error.message, "Invalid property");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubError {
    /// Human readable error message
    pub message: String,
    /// Extra structured information attached by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl SubError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Builds an entry from one element of an API `errors` array.
    ///
    /// Elements without a string `message` are kept, rendered as JSON, so
    /// that no reported error is ever dropped.
    pub fn from_value(value: &Value) -> Self {
        let message = match value.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        };

        Self {
            message,
            details: value.get("details").filter(|d| !d.is_null()).cloned(),
        }
    }

    /// Extracts the `errors` list of an API response body.
    ///
    /// Returns `None` when the body carries no `errors` array at all.
    pub fn list_from_body(body: &Value) -> Option<Vec<SubError>> {
        body.get("errors")
            .and_then(Value::as_array)
            .map(|errors| errors.iter().map(SubError::from_value).collect())
    }
}

impl std::fmt::Display for SubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<&str> for SubError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for SubError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Configuration for batch chunking.
///
/// # Examples
///
/// ```no_run
/// use bizops::batch::BatchConfig;
///
/// let config = BatchConfig::default();
/// assert_eq!(config.chunk_size(), 1000);
///
/// let config = BatchConfig::new(250);
/// assert_eq!(config.chunk_size(), 250);
/// ```
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct BatchConfig {
    /// Maximum number of records per request (default: 1000)
    chunk_size: Option<usize>,
}

impl BatchConfig {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: Some(chunk_size),
        }
    }

    /// Get the number of records sent per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }
}

/// Errors that stop a batch run before any chunk is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("Invalid chunk size: {size} (must be greater than zero)")]
    InvalidChunkSize { size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sub_error_from_structured_value() {
        let value = json!({
            "message": "Invalid property",
            "details": { "messages": ["name must be a string"] }
        });

        let error = SubError::from_value(&value);
        assert_eq!(error.message, "Invalid property");
        assert_eq!(
            error.details,
            Some(json!({ "messages": ["name must be a string"] }))
        );
    }

    #[test]
    fn test_sub_error_from_unstructured_value() {
        assert_eq!(SubError::from_value(&json!("plain")).message, "plain");
        assert_eq!(SubError::from_value(&json!(42)).message, "42");
        assert_eq!(
            SubError::from_value(&json!({ "code": 7 })).message,
            r#"{"code":7}"#
        );
    }

    #[test]
    fn test_list_from_body() {
        let body = json!({ "errors": [{ "message": "one" }, { "message": "two" }] });
        let errors = SubError::list_from_body(&body).unwrap();
        assert_eq!(errors, vec![SubError::new("one"), SubError::new("two")]);

        assert_eq!(SubError::list_from_body(&json!({ "errors": [] })), Some(vec![]));
        assert_eq!(SubError::list_from_body(&json!({ "errors": "nope" })), None);
        assert_eq!(SubError::list_from_body(&json!("text body")), None);
    }

    #[test]
    fn test_sub_error_serialization_omits_missing_details() {
        let serialized = serde_json::to_value(SubError::new("Oh no!")).unwrap();
        assert_eq!(serialized, json!({ "message": "Oh no!" }));
    }

    #[test]
    fn test_batch_config_defaults() {
        assert_eq!(BatchConfig::default().chunk_size(), DEFAULT_CHUNK_SIZE);

        let config: BatchConfig = serde_json::from_value(json!({ "chunk_size": 5 })).unwrap();
        assert_eq!(config.chunk_size(), 5);
    }
}
