use crate::batch::{ChunkFailure, SubError};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while validating client options.
///
/// These are fatal: a client is never constructed from invalid options and
/// no request is made.
///
/// # Examples
///
/// ```no_run
/// use bizops::{BizOpsClient, ClientOptions, ConfigurationError};
///
/// match BizOpsClient::new(ClientOptions::default()) {
///     Err(ConfigurationError::MissingApiKey) => eprintln!("Set BIZ_OPS_API_KEY"),
///     Err(other) => eprintln!("Invalid options: {other}"),
///     Ok(_) => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("An API key is required to request data from Biz Ops")]
    MissingApiKey,

    #[error("You must provide a valid system code or user ID to request data from Biz Ops")]
    MissingClientIdentity,

    #[error("A host URL for the Biz Ops API is required")]
    MissingHost,

    #[error("A timeout (in milliseconds) is required and must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid chunk size: {size} (must be greater than zero)")]
    InvalidChunkSize { size: usize },

    #[error("Invalid rate limit: {reason}")]
    InvalidRateLimit { reason: String },

    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },
}

/// Errors returned by Biz Ops API calls.
///
/// # Error Categories
///
/// - [`ApiError::Http`] - The API answered with a non-success status
/// - [`ApiError::GraphQl`] - The GraphQL endpoint reported errors
/// - [`ApiError::Request`] / [`ApiError::Timeout`] - The request never completed
/// - [`ApiError::InvalidResponse`] - The body could not be understood
///
/// When used as a batch chunk failure, the `errors` list of an HTTP or
/// GraphQL failure is reported entry by entry.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{message} (HTTP {status})")]
    Http {
        status: u16,
        message: String,
        errors: Option<Vec<SubError>>,
        body: Value,
    },

    #[error("{message}")]
    GraphQl {
        message: String,
        errors: Option<Vec<SubError>>,
        details: Value,
    },

    #[error("Request failed: {url} - {reason}")]
    Request { url: String, reason: String },

    #[error("Request timeout after {millis}ms: {url}")]
    Timeout { url: String, millis: u64 },

    #[error("Invalid response: expected {expected}, got {actual}")]
    InvalidResponse { expected: String, actual: String },
}

impl ApiError {
    /// Builds an [`ApiError::Http`] from a non-success response.
    ///
    /// The message is the first reported error message, a generic note when
    /// the `errors` list is malformed, or the status reason otherwise.
    pub fn from_response(status: u16, reason: Option<&str>, body: Value) -> Self {
        let errors = SubError::list_from_body(&body);

        let message = match body.get("errors") {
            Some(reported) => reported
                .get(0)
                .and_then(|first| first.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| "API response included errors".to_string()),
            None => match &body {
                Value::String(text) if !text.trim().is_empty() => text.clone(),
                _ => reason.unwrap_or("Unexpected HTTP status").to_string(),
            },
        };

        ApiError::Http {
            status,
            message,
            errors,
            body,
        }
    }

    /// Builds an [`ApiError::GraphQl`] from a response carrying `errors`.
    pub fn graphql(result: Value) -> Self {
        let message = result
            .get("errors")
            .and_then(|errors| errors.get(0))
            .and_then(|first| first.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("GraphQL API responded with an error")
            .to_string();

        ApiError::GraphQl {
            message,
            errors: SubError::list_from_body(&result),
            details: result,
        }
    }

    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl ChunkFailure for ApiError {
    fn sub_errors(&self) -> Option<&[SubError]> {
        match self {
            ApiError::Http {
                errors: Some(errors),
                ..
            } => Some(errors),
            ApiError::GraphQl {
                errors: Some(errors),
                ..
            } => Some(errors),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::collect_errors;
    use serde_json::json;

    #[test]
    fn test_http_error_uses_first_reported_message() {
        let error = ApiError::from_response(
            400,
            Some("Bad Request"),
            json!({ "errors": [{ "message": "Invalid code" }, { "message": "Invalid name" }] }),
        );

        assert_eq!(error.to_string(), "Invalid code (HTTP 400)");
        assert_eq!(error.status(), Some(400));
        assert_eq!(
            collect_errors(&error),
            vec![SubError::new("Invalid code"), SubError::new("Invalid name")]
        );
    }

    #[test]
    fn test_http_error_with_malformed_errors() {
        let error = ApiError::from_response(500, Some("Internal Server Error"), json!({ "errors": "yes" }));

        assert_eq!(error.to_string(), "API response included errors (HTTP 500)");
        assert_eq!(error.sub_errors(), None);
        assert_eq!(collect_errors(&error).len(), 1);
    }

    #[test]
    fn test_http_error_without_errors_falls_back_to_reason() {
        let error = ApiError::from_response(404, Some("Not Found"), Value::Null);

        assert_eq!(error.to_string(), "Not Found (HTTP 404)");
        assert!(error.is_not_found());
        assert_eq!(
            collect_errors(&error),
            vec![SubError::new("Not Found (HTTP 404)")]
        );
    }

    #[test]
    fn test_http_error_with_text_body() {
        let error = ApiError::from_response(500, Some("Internal Server Error"), json!("Oh dear!"));
        assert_eq!(error.to_string(), "Oh dear! (HTTP 500)");
    }

    #[test]
    fn test_graphql_error_message() {
        let error = ApiError::graphql(json!({ "data": null, "errors": [{ "message": "Rubbish!" }] }));
        assert_eq!(error.to_string(), "Rubbish!");
        assert_eq!(error.sub_errors().map(<[SubError]>::len), Some(1));

        let error = ApiError::graphql(json!({ "errors": [] }));
        assert_eq!(error.to_string(), "GraphQL API responded with an error");
    }

    #[test]
    fn test_graphql_error_with_malformed_errors() {
        let error = ApiError::graphql(json!({ "data": null, "errors": "yes" }));

        assert_eq!(error.sub_errors(), None);
        assert_eq!(
            collect_errors(&error),
            vec![SubError::new("GraphQL API responded with an error")]
        );
    }

    #[test]
    fn test_transport_errors_are_opaque() {
        let error = ApiError::Timeout {
            url: "https://example.com/v1/batch/Team".to_string(),
            millis: 8000,
        };

        assert_eq!(error.status(), None);
        assert_eq!(
            collect_errors(&error),
            vec![SubError::new(
                "Request timeout after 8000ms: https://example.com/v1/batch/Team"
            )]
        );
    }
}
